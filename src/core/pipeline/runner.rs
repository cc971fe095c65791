//! Pipeline runner - executes the three steps in order
//!
//! A run is strictly sequential: extraction, then the staging load, then the
//! merge. The first failing step halts the run and the remaining steps are
//! recorded as skipped.

use crate::adapters::database::{create_stores, RelationalStore};
use crate::adapters::intermediate::IntermediateStore;
use crate::config::DwhSyncConfig;
use crate::core::pipeline::extract::Extractor;
use crate::core::pipeline::merge::MergeDeduplicator;
use crate::core::pipeline::staging::StagingLoader;
use crate::core::pipeline::step::PipelineStep;
use crate::core::pipeline::summary::{RunSummary, StepOutcome};
use crate::domain::Result;
use crate::{log_error_with_context, log_step_complete, log_step_start};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// The three pipeline steps wired to their stores
pub struct Pipeline {
    extractor: Extractor,
    loader: StagingLoader,
    merger: MergeDeduplicator,
}

impl Pipeline {
    pub fn new(extractor: Extractor, loader: StagingLoader, merger: MergeDeduplicator) -> Self {
        Self {
            extractor,
            loader,
            merger,
        }
    }

    /// Build the pipeline against the PostgreSQL stores named in `config`
    pub fn from_config(config: &DwhSyncConfig) -> Result<Self> {
        let stores = create_stores(config)?;
        Self::with_stores(config, stores.source, stores.warehouse)
    }

    /// Build the pipeline from `config` against the given stores
    pub fn with_stores(
        config: &DwhSyncConfig,
        source: Arc<dyn RelationalStore>,
        warehouse: Arc<dyn RelationalStore>,
    ) -> Result<Self> {
        let mapping = config.mapping.field_mapping();
        let intermediate = IntermediateStore::from_config(&config.intermediate)?;
        let hash_column = config.mapping.hash_column.clone();

        let extractor = Extractor::new(
            source,
            config.source.table_ref(),
            mapping.source_columns().to_vec(),
            intermediate.clone(),
        );

        let merger = MergeDeduplicator::new(
            warehouse.clone(),
            config.warehouse.staging_table_ref(),
            config.warehouse.target_table_ref(),
            mapping.target_columns().to_vec(),
            hash_column.clone(),
        );

        let loader = StagingLoader::new(
            warehouse,
            config.warehouse.staging_table_ref(),
            mapping,
            hash_column,
            intermediate,
            config.warehouse.batch_size,
        );

        Ok(Self::new(extractor, loader, merger))
    }

    /// Execute one step on its own
    ///
    /// Returns the number of rows the step wrote. Ordering is the caller's
    /// responsibility: staging without a prior extraction fails with
    /// `MissingIntermediateData`.
    pub async fn run_step(&self, step: PipelineStep) -> Result<u64> {
        match step {
            PipelineStep::Extract => self.extractor.extract().await.map(|n| n as u64),
            PipelineStep::LoadToStaging => self.loader.load_to_staging().await.map(|n| n as u64),
            PipelineStep::MergeToTarget => self.merger.merge_to_target().await,
        }
    }

    /// Execute a full run
    pub async fn run(&self) -> RunSummary {
        // The sender is dropped at once, so the receiver always reads `false`.
        let (_, shutdown) = watch::channel(false);
        self.run_until(&shutdown).await
    }

    /// Execute a full run, checking for shutdown between steps
    ///
    /// A step in progress always finishes. Once shutdown is requested the
    /// remaining steps are skipped and the summary is marked interrupted.
    pub async fn run_until(&self, shutdown: &watch::Receiver<bool>) -> RunSummary {
        let start_time = Instant::now();
        let mut summary = RunSummary::new();
        let run_id = summary.run_id;

        tracing::info!(run_id = %run_id, "Starting pipeline run");

        for step in PipelineStep::ALL {
            let ready = step
                .depends_on()
                .map_or(true, |previous| summary.step_succeeded(previous));
            if !ready || summary.interrupted {
                summary.record(StepOutcome::skipped(step));
                continue;
            }

            if *shutdown.borrow() {
                tracing::warn!(run_id = %run_id, step = %step, "Shutdown requested, stopping run");
                summary.interrupted = true;
                summary.record(StepOutcome::skipped(step));
                continue;
            }

            log_step_start!(run_id, step);
            let step_start = Instant::now();

            match self.run_step(step).await {
                Ok(rows) => {
                    log_step_complete!(run_id, step, rows, step_start.elapsed());
                    summary.record(StepOutcome::succeeded(step, rows, step_start.elapsed()));
                }
                Err(e) => {
                    log_error_with_context!(&e, step.name());
                    summary.record(StepOutcome::failed(step, &e, step_start.elapsed()));
                    summary.error = Some(e);
                }
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        summary
    }
}
