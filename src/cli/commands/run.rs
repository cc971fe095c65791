//! Run command implementation
//!
//! This module implements the `run` command, which executes the three
//! pipeline steps once.

use crate::cli::commands::exit_code;
use crate::config::load_config;
use crate::core::pipeline::{Pipeline, RunSummary, StepStatus};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

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

        let summary = pipeline.run_until(&shutdown_signal).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }

        Ok(summary_exit_code(&summary))
    }
}

/// Exit code for a finished run
pub fn summary_exit_code(summary: &RunSummary) -> i32 {
    if summary.interrupted {
        130
    } else if let Some(e) = &summary.error {
        exit_code(e)
    } else {
        0
    }
}

/// Print a human-readable run summary
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Run Summary ({})", summary.run_id);
    for outcome in &summary.steps {
        let marker = match outcome.status {
            StepStatus::Succeeded => "✅",
            StepStatus::Failed => "❌",
            StepStatus::Skipped => "⏭️ ",
        };
        match outcome.rows {
            Some(rows) => println!(
                "  {marker} {:<16} {rows} rows in {:.2}s",
                outcome.step.name(),
                outcome.duration.as_secs_f64()
            ),
            None => println!("  {marker} {}", outcome.step.name()),
        }
        if let Some(error) = &outcome.error {
            println!("     Error: {error}");
        }
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if summary.interrupted {
        println!("⚠️  Run interrupted before completion");
    } else if summary.is_successful() {
        println!("✅ Run completed successfully!");
    } else {
        println!("❌ Run failed");
    }
}
