//! Step command implementation
//!
//! Runs a single pipeline step, the way a scheduler task would.

use crate::cli::commands::exit_code;
use crate::config::load_config;
use crate::core::pipeline::{Pipeline, PipelineStep};
use crate::{log_error_with_context, log_step_complete, log_step_start};
use clap::Args;
use std::time::Instant;
use uuid::Uuid;

/// Arguments for the step command
#[derive(Args, Debug)]
pub struct StepArgs {
    /// Step to run: extract, load_to_staging or merge_to_target (alias: transform)
    pub step: PipelineStep,
}

impl StepArgs {
    /// Execute the step command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let pipeline = match Pipeline::from_config(&config) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Failed to prepare pipeline: {e}");
                return Ok(exit_code(&e));
            }
        };

        let run_id = Uuid::new_v4();
        let start = Instant::now();
        log_step_start!(run_id, self.step);

        match pipeline.run_step(self.step).await {
            Ok(rows) => {
                log_step_complete!(run_id, self.step, rows, start.elapsed());
                println!("✅ {}: {rows} rows", self.step);
                Ok(0)
            }
            Err(e) => {
                log_error_with_context!(&e, self.step.name());
                eprintln!("❌ {} failed: {e}", self.step);
                Ok(exit_code(&e))
            }
        }
    }
}
