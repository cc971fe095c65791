//! Extraction: source table to intermediate file

use crate::adapters::database::RelationalStore;
use crate::adapters::intermediate::IntermediateStore;
use crate::domain::{Result, TableRef};
use std::sync::Arc;

/// Copies the projected source table into the intermediate store
pub struct Extractor {
    store: Arc<dyn RelationalStore>,
    table: TableRef,
    columns: Vec<String>,
    intermediate: IntermediateStore,
}

impl Extractor {
    /// Create a new extractor
    ///
    /// # Arguments
    ///
    /// * `store` - Source database
    /// * `table` - Source table
    /// * `columns` - Source projection list, in mapping order
    /// * `intermediate` - File the rows are written to
    pub fn new(
        store: Arc<dyn RelationalStore>,
        table: TableRef,
        columns: Vec<String>,
        intermediate: IntermediateStore,
    ) -> Self {
        Self {
            store,
            table,
            columns,
            intermediate,
        }
    }

    /// Read the whole source table and overwrite the intermediate file
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Fails with `ConnectionUnavailable` if the source cannot be reached, in
    /// which case the intermediate file is left untouched.
    pub async fn extract(&self) -> Result<usize> {
        let records = {
            let mut conn = self.store.connect().await?;
            conn.select(&self.table, &self.columns).await?
        };

        tracing::debug!(
            table = %self.table,
            rows = records.len(),
            "Fetched source rows"
        );

        self.intermediate.write(&records)
    }
}
