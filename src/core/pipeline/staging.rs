//! Staging load: intermediate file to staging table
//!
//! Each record is hashed over its full ordered source tuple, relabelled through
//! the rename table and appended to the staging table in one batched insert.
//! Source-only fields take part in the hash but are not staged.

use crate::adapters::database::RelationalStore;
use crate::adapters::intermediate::IntermediateStore;
use crate::core::hash::row_hash;
use crate::domain::{FieldMapping, RawRecord, Result, StagingBatch, TableRef, Value};
use std::sync::Arc;

/// Loads the intermediate file into the staging table
pub struct StagingLoader {
    store: Arc<dyn RelationalStore>,
    table: TableRef,
    mapping: FieldMapping,
    hash_column: String,
    intermediate: IntermediateStore,
    batch_size: usize,
}

impl StagingLoader {
    pub fn new(
        store: Arc<dyn RelationalStore>,
        table: TableRef,
        mapping: FieldMapping,
        hash_column: impl Into<String>,
        intermediate: IntermediateStore,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            table,
            mapping,
            hash_column: hash_column.into(),
            intermediate,
            batch_size,
        }
    }

    /// Relabel and hash records into an insertable batch
    ///
    /// Columns are the staged target names in source order, then the hash column.
    pub fn build_batch(&self, records: &[RawRecord]) -> StagingBatch {
        let staged = self.mapping.staged_fields();

        let mut columns: Vec<String> = staged.iter().map(|(_, name)| name.to_string()).collect();
        columns.push(self.hash_column.clone());

        let mut batch = StagingBatch::new(columns);
        for record in records {
            let mut row: Vec<Value> = staged
                .iter()
                .map(|(position, _)| record.values().get(*position).cloned().flatten())
                .collect();
            row.push(Some(row_hash(record.values())));
            batch.push(row);
        }
        batch
    }

    /// Read the intermediate file and append every record to the staging table
    ///
    /// Returns the number of rows staged. An empty file stages nothing.
    ///
    /// # Errors
    ///
    /// * `MissingIntermediateData` if extraction has not produced a file
    /// * `ConnectionUnavailable` if the warehouse cannot be reached; nothing is inserted
    /// * `Store` if the insert fails; the whole load is rolled back
    pub async fn load_to_staging(&self) -> Result<usize> {
        let records = self.intermediate.read(self.mapping.source_columns().len())?;
        let batch = self.build_batch(&records);

        let mut conn = self.store.connect().await?;
        let inserted = conn
            .insert_batch(&self.table, &batch, self.batch_size)
            .await?;

        tracing::debug!(
            table = %self.table,
            rows = inserted,
            columns = ?batch.columns,
            "Loaded staging rows"
        );

        Ok(batch.len())
    }
}
