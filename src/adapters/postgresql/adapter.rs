//! PostgreSQL connection implementing [`StoreConnection`]

use crate::adapters::database::traits::StoreConnection;
use crate::adapters::postgresql::sql;
use crate::domain::{PipelineError, RawRecord, Result, StagingBatch, TableRef};
use async_trait::async_trait;
use deadpool_postgres::Object;
use tokio_postgres::SimpleQueryMessage;

/// A pooled PostgreSQL connection, returned to the pool on drop
pub struct PostgreSQLConnection {
    store: String,
    client: Object,
}

impl PostgreSQLConnection {
    pub fn new(store: String, client: Object) -> Self {
        Self { store, client }
    }
}

fn store_error(context: &str, err: tokio_postgres::Error) -> PipelineError {
    PipelineError::Store(format!("{context}: {err}"))
}

fn rows_affected(messages: &[SimpleQueryMessage]) -> u64 {
    messages
        .iter()
        .map(|m| match m {
            SimpleQueryMessage::CommandComplete(count) => *count,
            _ => 0,
        })
        .sum()
}

#[async_trait]
impl StoreConnection for PostgreSQLConnection {
    async fn ping(&mut self) -> Result<()> {
        self.client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| store_error("Connection test failed", e))?;
        Ok(())
    }

    async fn select(&mut self, table: &TableRef, columns: &[String]) -> Result<Vec<RawRecord>> {
        let query = sql::select_sql(table, columns);
        tracing::debug!(store = %self.store, query = %query, "Executing projection query");

        // The simple protocol returns every value as text, whatever the column type.
        let messages = self
            .client
            .simple_query(&query)
            .await
            .map_err(|e| store_error("Query failed", e))?;

        let records = messages
            .into_iter()
            .filter_map(|message| match message {
                SimpleQueryMessage::Row(row) => Some(RawRecord::new(
                    (0..row.len())
                        .map(|i| row.get(i).map(str::to_string))
                        .collect(),
                )),
                _ => None,
            })
            .collect();

        Ok(records)
    }

    async fn insert_batch(
        &mut self,
        table: &TableRef,
        batch: &StagingBatch,
        page_size: usize,
    ) -> Result<u64> {
        if batch.is_empty() {
            return Ok(0);
        }

        let transaction = self
            .client
            .transaction()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        transaction
            .simple_query(sql::LITERAL_MODE_SQL)
            .await
            .map_err(|e| store_error("Failed to set literal mode", e))?;

        let mut inserted = 0;
        for page in batch.rows.chunks(page_size.max(1)) {
            let statement = sql::insert_values_sql(table, &batch.columns, page);
            let messages = transaction
                .simple_query(&statement)
                .await
                .map_err(|e| store_error("Batch insert failed", e))?;
            inserted += rows_affected(&messages);
            tracing::trace!(store = %self.store, table = %table, rows = page.len(), "Inserted page");
        }

        transaction
            .commit()
            .await
            .map_err(|e| store_error("Failed to commit batch insert", e))?;

        Ok(inserted)
    }

    async fn insert_unseen(
        &mut self,
        from: &TableRef,
        into: &TableRef,
        columns: &[String],
        hash_column: &str,
    ) -> Result<u64> {
        let statement = sql::insert_unseen_sql(from, into, columns, hash_column);
        tracing::debug!(store = %self.store, statement = %statement, "Executing merge statement");

        self.client
            .execute(statement.as_str(), &[])
            .await
            .map_err(|e| store_error("Merge statement failed", e))
    }
}
