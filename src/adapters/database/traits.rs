//! Relational store abstraction
//!
//! This module defines the traits that store adapters must implement to serve
//! as the source or the warehouse of a pipeline run.

use crate::domain::{RawRecord, Result, StagingBatch, TableRef};
use async_trait::async_trait;

/// A relational database the pipeline reads from or writes to
///
/// Implementations hand out scoped connections. A connection is released when
/// the returned box is dropped, including when a step fails halfway through.
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Label used in logs and errors (e.g. "source", "warehouse")
    fn name(&self) -> &str;

    /// Acquire a connection
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::PipelineError::ConnectionUnavailable`] if the
    /// store cannot be reached. Callers must not retry.
    async fn connect(&self) -> Result<Box<dyn StoreConnection>>;
}

/// An established connection to a [`RelationalStore`]
#[async_trait]
pub trait StoreConnection: Send {
    /// Round-trip check, used by `validate-config --check-connections`
    async fn ping(&mut self) -> Result<()>;

    /// Read every row of `table`, projected to `columns` in the given order
    async fn select(&mut self, table: &TableRef, columns: &[String]) -> Result<Vec<RawRecord>>;

    /// Insert all rows of `batch` into `table`
    ///
    /// Rows are sent as multi-row INSERT statements of at most `page_size`
    /// rows each, committed together. Columns missing from `batch` get their
    /// default (auto-assigned identifiers included).
    ///
    /// # Returns
    ///
    /// Returns the number of rows inserted.
    async fn insert_batch(
        &mut self,
        table: &TableRef,
        batch: &StagingBatch,
        page_size: usize,
    ) -> Result<u64>;

    /// Copy `columns` of every row of `from` into `into`, skipping rows whose
    /// `hash_column` value is already present in `into`
    ///
    /// Runs as a single statement. Existing rows of `into` are never modified.
    ///
    /// # Returns
    ///
    /// Returns the number of rows inserted.
    async fn insert_unseen(
        &mut self,
        from: &TableRef,
        into: &TableRef,
        columns: &[String],
        hash_column: &str,
    ) -> Result<u64>;
}
