//! Interval scheduler
//!
//! Triggers a pipeline run every `interval`, the first one immediately. Runs
//! never overlap: a tick that comes due while a run is in progress is delayed
//! until it finishes. With `depends_on_past` a failed run blocks every later
//! run and the scheduler stops with [`PipelineError::RunBlocked`].

use crate::config::ScheduleConfig;
use crate::core::pipeline::{Pipeline, RunSummary};
use crate::domain::{PipelineError, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Why the scheduler loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The configured number of runs was reached
    MaxRuns,
    /// A shutdown signal was received
    Shutdown,
}

/// Counters for a scheduler session
#[derive(Debug, Serialize)]
pub struct SchedulerReport {
    pub runs: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub stop_reason: StopReason,
}

/// Runs a [`Pipeline`] on a fixed interval
pub struct Scheduler {
    pipeline: Pipeline,
    interval: Duration,
    depends_on_past: bool,
    max_runs: Option<usize>,
}

impl Scheduler {
    pub fn new(pipeline: Pipeline, config: &ScheduleConfig) -> Self {
        Self {
            pipeline,
            interval: config.interval(),
            depends_on_past: config.depends_on_past,
            max_runs: None,
        }
    }

    /// Stop after `max_runs` runs
    pub fn with_max_runs(mut self, max_runs: Option<usize>) -> Self {
        self.max_runs = max_runs;
        self
    }

    /// Run until shutdown, `max_runs`, or a blocking failure
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::RunBlocked`] when a run fails and
    /// `depends_on_past` is set.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<SchedulerReport> {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            depends_on_past = self.depends_on_past,
            max_runs = self.max_runs,
            "Scheduler started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut runs = 0;
        let mut succeeded = 0;
        let mut failed = 0;

        let stop_reason = loop {
            if self.max_runs.is_some_and(|max| runs >= max) {
                break StopReason::MaxRuns;
            }
            if *shutdown.borrow() {
                break StopReason::Shutdown;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    // A dropped sender can no longer signal; treat it as shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        break StopReason::Shutdown;
                    }
                    continue;
                }
            }

            let summary = self.pipeline.run_until(&shutdown).await;
            runs += 1;

            if summary.interrupted {
                break StopReason::Shutdown;
            }
            if summary.is_successful() {
                succeeded += 1;
                continue;
            }

            failed += 1;
            if self.depends_on_past {
                return Err(blocked(&summary));
            }
            tracing::warn!(run_id = %summary.run_id, "Run failed, continuing with next interval");
        };

        tracing::info!(
            runs = runs,
            succeeded = succeeded,
            failed = failed,
            reason = ?stop_reason,
            "Scheduler stopped"
        );

        Ok(SchedulerReport {
            runs,
            succeeded,
            failed,
            stop_reason,
        })
    }
}

fn blocked(summary: &RunSummary) -> PipelineError {
    let step = summary
        .failed_step()
        .map(|s| s.name())
        .unwrap_or("unknown");
    let cause = summary
        .error
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_default();

    tracing::error!(
        run_id = %summary.run_id,
        step = step,
        "Run failed; later runs are blocked until it is resolved"
    );

    PipelineError::RunBlocked(format!(
        "run {} failed at step {step}: {cause}",
        summary.run_id
    ))
}
