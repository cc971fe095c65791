//! In-process relational store
//!
//! Keeps tables in memory behind a mutex and implements the same semantics as
//! the PostgreSQL adapter: projection queries, multi-row inserts that fill an
//! auto-assigned identity column, and the set-based insert-if-hash-unseen copy.
//! Clones share the same tables, so a test can hold one handle for assertions
//! while the pipeline uses another.
//!
//! ```rust
//! use dwhsync::adapters::memory::MemoryStore;
//! use dwhsync::domain::{RawRecord, TableRef};
//!
//! # fn example() -> dwhsync::domain::Result<()> {
//! let store = MemoryStore::new("source");
//! let orders = TableRef::new("public", "order");
//! store.create_table(&orders, &["id", "stage"], None)?;
//! store.insert_records(&orders, vec![RawRecord::from_text(["1", "a"])])?;
//! assert_eq!(store.row_count(&orders)?, 1);
//! # Ok(())
//! # }
//! ```

use crate::adapters::database::traits::{RelationalStore, StoreConnection};
use crate::domain::{PipelineError, RawRecord, Result, StagingBatch, TableRef, Value};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct MemoryTable {
    columns: Vec<String>,
    identity: Option<usize>,
    next_id: u64,
    rows: Vec<Vec<Value>>,
}

impl MemoryTable {
    fn column_index(&self, table: &TableRef, column: &str) -> Result<usize> {
        self.columns.iter().position(|c| c == column).ok_or_else(|| {
            PipelineError::Store(format!(
                "column \"{column}\" of relation \"{table}\" does not exist"
            ))
        })
    }

    fn column_indexes(&self, table: &TableRef, columns: &[String]) -> Result<Vec<usize>> {
        columns
            .iter()
            .map(|c| self.column_index(table, c))
            .collect()
    }

    /// Build a full-width row, assigning the identity column when not supplied
    fn complete_row(&mut self, positions: &[usize], values: &[Value]) -> Vec<Value> {
        let mut row = vec![None; self.columns.len()];
        for (position, value) in positions.iter().zip(values) {
            row[*position] = value.clone();
        }
        if let Some(identity) = self.identity {
            if !positions.contains(&identity) {
                self.next_id += 1;
                row[identity] = Some(self.next_id.to_string());
            }
        }
        row
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<TableRef, MemoryTable>,
    unavailable: bool,
}

impl MemoryState {
    fn table(&self, table: &TableRef) -> Result<&MemoryTable> {
        self.tables.get(table).ok_or_else(|| missing_relation(table))
    }

    fn table_mut(&mut self, table: &TableRef) -> Result<&mut MemoryTable> {
        self.tables.get_mut(table).ok_or_else(|| missing_relation(table))
    }
}

fn missing_relation(table: &TableRef) -> PipelineError {
    PipelineError::Store(format!("relation \"{table}\" does not exist"))
}

/// A relational store held in memory
#[derive(Debug, Clone)]
pub struct MemoryStore {
    name: String,
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| PipelineError::Store(format!("{} store lock poisoned", self.name)))
    }

    /// Create (or replace) a table
    ///
    /// `identity` names a column filled with 1, 2, 3... when an insert omits it.
    pub fn create_table(
        &self,
        table: &TableRef,
        columns: &[&str],
        identity: Option<&str>,
    ) -> Result<()> {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let identity = match identity {
            Some(name) => Some(columns.iter().position(|c| c == name).ok_or_else(|| {
                PipelineError::Store(format!("identity column \"{name}\" not in {table}"))
            })?),
            None => None,
        };

        self.lock()?.tables.insert(
            table.clone(),
            MemoryTable {
                columns,
                identity,
                next_id: 0,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    /// Append full-width records, in table column order
    pub fn insert_records(&self, table: &TableRef, records: Vec<RawRecord>) -> Result<()> {
        let mut state = self.lock()?;
        let target = state.table_mut(table)?;
        for record in records {
            if record.len() != target.columns.len() {
                return Err(PipelineError::Store(format!(
                    "INSERT into {table} has {} values for {} columns",
                    record.len(),
                    target.columns.len()
                )));
            }
            target.rows.push(record.into_values());
        }
        Ok(())
    }

    /// Replace every row of a table
    pub fn replace_records(&self, table: &TableRef, records: Vec<RawRecord>) -> Result<()> {
        self.lock()?.table_mut(table)?.rows.clear();
        self.insert_records(table, records)
    }

    /// Number of rows in a table
    pub fn row_count(&self, table: &TableRef) -> Result<usize> {
        Ok(self.lock()?.table(table)?.rows.len())
    }

    /// All values of one column, in insertion order
    pub fn column_values(&self, table: &TableRef, column: &str) -> Result<Vec<Value>> {
        let state = self.lock()?;
        let source = state.table(table)?;
        let index = source.column_index(table, column)?;
        Ok(source.rows.iter().map(|row| row[index].clone()).collect())
    }

    /// Simulate an outage: every later `connect` fails until restored
    pub fn set_available(&self, available: bool) -> Result<()> {
        self.lock()?.unavailable = !available;
        Ok(())
    }
}

#[async_trait]
impl RelationalStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> Result<Box<dyn StoreConnection>> {
        if self.lock()?.unavailable {
            return Err(PipelineError::connection_unavailable(
                &self.name,
                "store is offline",
            ));
        }
        Ok(Box::new(MemoryConnection {
            store: self.clone(),
        }))
    }
}

/// Connection handle to a [`MemoryStore`]
pub struct MemoryConnection {
    store: MemoryStore,
}

#[async_trait]
impl StoreConnection for MemoryConnection {
    async fn ping(&mut self) -> Result<()> {
        self.store.lock().map(|_| ())
    }

    async fn select(&mut self, table: &TableRef, columns: &[String]) -> Result<Vec<RawRecord>> {
        let state = self.store.lock()?;
        let source = state.table(table)?;
        let indexes = source.column_indexes(table, columns)?;

        Ok(source
            .rows
            .iter()
            .map(|row| RawRecord::new(indexes.iter().map(|i| row[*i].clone()).collect()))
            .collect())
    }

    async fn insert_batch(
        &mut self,
        table: &TableRef,
        batch: &StagingBatch,
        _page_size: usize,
    ) -> Result<u64> {
        let mut state = self.store.lock()?;
        let target = state.table_mut(table)?;
        let positions = target.column_indexes(table, &batch.columns)?;

        let rows: Vec<Vec<Value>> = batch
            .rows
            .iter()
            .map(|values| target.complete_row(&positions, values))
            .collect();
        let inserted = rows.len() as u64;
        target.rows.extend(rows);

        Ok(inserted)
    }

    async fn insert_unseen(
        &mut self,
        from: &TableRef,
        into: &TableRef,
        columns: &[String],
        hash_column: &str,
    ) -> Result<u64> {
        let mut state = self.store.lock()?;

        let source = state.table(from)?;
        let source_positions = source.column_indexes(from, columns)?;
        let source_hash = source.column_index(from, hash_column)?;

        let destination = state.table(into)?;
        let destination_hash = destination.column_index(into, hash_column)?;
        // NULL never equals NULL, so rows without a hash are always copied.
        let seen: HashSet<&str> = destination
            .rows
            .iter()
            .filter_map(|row| row[destination_hash].as_deref())
            .collect();

        let selected: Vec<Vec<Value>> = source
            .rows
            .iter()
            .filter(|row| match row[source_hash].as_deref() {
                Some(hash) => !seen.contains(hash),
                None => true,
            })
            .map(|row| source_positions.iter().map(|i| row[*i].clone()).collect())
            .collect();

        let destination = state.table_mut(into)?;
        let positions = destination.column_indexes(into, columns)?;
        let rows: Vec<Vec<Value>> = selected
            .iter()
            .map(|values| destination.complete_row(&positions, values))
            .collect();
        let inserted = rows.len() as u64;
        destination.rows.extend(rows);

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staging() -> TableRef {
        TableRef::new("public", "raw_order_temp")
    }

    fn target() -> TableRef {
        TableRef::new("public", "raw_order")
    }

    fn store() -> MemoryStore {
        let store = MemoryStore::new("warehouse");
        store
            .create_table(&staging(), &["id", "order_id", "row_hash"], Some("id"))
            .unwrap();
        store
            .create_table(&target(), &["id", "order_id", "row_hash"], None)
            .unwrap();
        store
    }

    fn batch(rows: &[(&str, &str)]) -> StagingBatch {
        let mut batch = StagingBatch::new(vec!["order_id".to_string(), "row_hash".to_string()]);
        for (order_id, hash) in rows {
            batch.push(vec![Some(order_id.to_string()), Some(hash.to_string())]);
        }
        batch
    }

    fn columns() -> Vec<String> {
        vec!["id".to_string(), "order_id".to_string(), "row_hash".to_string()]
    }

    #[tokio::test]
    async fn test_insert_batch_assigns_identity() {
        let store = store();
        let mut conn = store.connect().await.unwrap();

        let inserted = conn
            .insert_batch(&staging(), &batch(&[("1", "h1"), ("2", "h2")]), 1000)
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(
            store.column_values(&staging(), "id").unwrap(),
            vec![Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_insert_batch_unknown_column_fails() {
        let store = store();
        let mut conn = store.connect().await.unwrap();
        let mut bad = StagingBatch::new(vec!["missing".to_string()]);
        bad.push(vec![Some("x".to_string())]);

        let err = conn.insert_batch(&staging(), &bad, 10).await.unwrap_err();
        assert!(matches!(err, PipelineError::Store(_)));
        assert_eq!(store.row_count(&staging()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_select_projects_columns_in_order() {
        let store = store();
        let mut conn = store.connect().await.unwrap();
        conn.insert_batch(&staging(), &batch(&[("7", "h7")]), 10)
            .await
            .unwrap();

        let rows = conn
            .select(&staging(), &["row_hash".to_string(), "order_id".to_string()])
            .await
            .unwrap();
        assert_eq!(rows, vec![RawRecord::from_text(["h7", "7"])]);
    }

    #[tokio::test]
    async fn test_select_missing_table_fails() {
        let store = MemoryStore::new("source");
        let mut conn = store.connect().await.unwrap();
        let err = conn
            .select(&TableRef::new("public", "order"), &["id".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_insert_unseen_skips_known_hashes() {
        let store = store();
        let mut conn = store.connect().await.unwrap();
        conn.insert_batch(&staging(), &batch(&[("1", "h1"), ("2", "h2")]), 10)
            .await
            .unwrap();

        let first = conn
            .insert_unseen(&staging(), &target(), &columns(), "row_hash")
            .await
            .unwrap();
        let second = conn
            .insert_unseen(&staging(), &target(), &columns(), "row_hash")
            .await
            .unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(store.row_count(&target()).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_store_refuses_connections() {
        let store = store();
        store.set_available(false).unwrap();
        let err = store.connect().await.err().unwrap();
        assert!(err.is_connection_error());

        store.set_available(true).unwrap();
        assert!(store.connect().await.is_ok());
    }
}
