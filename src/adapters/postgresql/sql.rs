//! SQL text for the PostgreSQL adapter
//!
//! Identifiers are always double-quoted. Values are rendered as quoted literals
//! so PostgreSQL assigns them to the column types of the target table; the
//! pipeline itself never coerces types.

use crate::domain::{TableRef, Value};

/// Quote an identifier, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Schema-qualified, quoted table name
pub fn qualified(table: &TableRef) -> String {
    format!("{}.{}", quote_ident(&table.schema), quote_ident(&table.table))
}

/// Session setting under which [`quote_literal`] output is read verbatim
///
/// Sent at the start of every transaction that inserts literals. `SET LOCAL`
/// reverts when the transaction ends, so pooled connections keep the server
/// default.
pub const LITERAL_MODE_SQL: &str = "SET LOCAL standard_conforming_strings = on";

/// Render a value as a string literal or `NULL`
///
/// Only single quotes are escaped; backslashes are literal under
/// [`LITERAL_MODE_SQL`].
pub fn quote_literal(value: &Value) -> String {
    match value {
        Some(text) => format!("'{}'", text.replace('\'', "''")),
        None => "NULL".to_string(),
    }
}

fn column_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `SELECT <columns> FROM <table>`
pub fn select_sql(table: &TableRef, columns: &[String]) -> String {
    format!("SELECT {} FROM {}", column_list(columns), qualified(table))
}

/// Multi-row `INSERT INTO <table> (<columns>) VALUES (...), (...)`
pub fn insert_values_sql(table: &TableRef, columns: &[String], rows: &[Vec<Value>]) -> String {
    let values = rows
        .iter()
        .map(|row| {
            let literals = row.iter().map(quote_literal).collect::<Vec<_>>().join(", ");
            format!("({literals})")
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        qualified(table),
        column_list(columns),
        values
    )
}

/// Set-based copy of rows whose hash is not yet present in the destination
pub fn insert_unseen_sql(
    from: &TableRef,
    into: &TableRef,
    columns: &[String],
    hash_column: &str,
) -> String {
    let projection = columns
        .iter()
        .map(|c| format!("staging.{}", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    let hash = quote_ident(hash_column);

    format!(
        "INSERT INTO {into} ({columns}) \
         SELECT {projection} FROM {from} AS staging \
         WHERE NOT EXISTS (SELECT 1 FROM {into} AS target WHERE target.{hash} = staging.{hash})",
        into = qualified(into),
        columns = column_list(columns),
        projection = projection,
        from = qualified(from),
        hash = hash,
    )
}
