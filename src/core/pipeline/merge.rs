//! Merge: staging table to target table, skipping hashes already present

use crate::adapters::database::RelationalStore;
use crate::domain::{Result, TableRef};
use std::sync::Arc;

/// Appends unseen staging rows to the target table
///
/// Rows are compared by hash only. A changed source row has a new hash and is
/// appended as a new target row; existing target rows are never updated.
pub struct MergeDeduplicator {
    store: Arc<dyn RelationalStore>,
    staging: TableRef,
    target: TableRef,
    columns: Vec<String>,
    hash_column: String,
}

impl MergeDeduplicator {
    pub fn new(
        store: Arc<dyn RelationalStore>,
        staging: TableRef,
        target: TableRef,
        columns: Vec<String>,
        hash_column: impl Into<String>,
    ) -> Self {
        Self {
            store,
            staging,
            target,
            columns,
            hash_column: hash_column.into(),
        }
    }

    /// Run the set-based insert and return the number of rows added to the target
    pub async fn merge_to_target(&self) -> Result<u64> {
        let mut conn = self.store.connect().await?;
        let inserted = conn
            .insert_unseen(&self.staging, &self.target, &self.columns, &self.hash_column)
            .await?;

        tracing::debug!(
            staging = %self.staging,
            target = %self.target,
            rows = inserted,
            "Merged staging into target"
        );

        Ok(inserted)
    }
}
