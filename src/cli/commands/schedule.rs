//! Schedule command implementation
//!
//! Runs the pipeline every `schedule.interval_seconds` until interrupted.

use crate::cli::commands::exit_code;
use crate::config::load_config;
use crate::core::pipeline::Pipeline;
use crate::core::schedule::{Scheduler, StopReason};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the schedule command
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Stop after this many runs
    #[arg(long)]
    pub max_runs: Option<usize>,
}

impl ScheduleArgs {
    /// Execute the schedule command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
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

        println!(
            "⏱️  Running every {}s{}",
            config.schedule.interval_seconds,
            if config.schedule.depends_on_past {
                ", stopping on the first failed run"
            } else {
                ""
            }
        );

        let scheduler = Scheduler::new(pipeline, &config.schedule).with_max_runs(self.max_runs);

        match scheduler.run(shutdown_signal).await {
            Ok(report) => {
                println!(
                    "Runs: {} (succeeded {}, failed {})",
                    report.runs, report.succeeded, report.failed
                );
                Ok(match report.stop_reason {
                    StopReason::Shutdown => 130,
                    StopReason::MaxRuns if report.failed > 0 => 5,
                    StopReason::MaxRuns => 0,
                })
            }
            Err(e) => {
                eprintln!("❌ {e}");
                Ok(exit_code(&e))
            }
        }
    }
}
