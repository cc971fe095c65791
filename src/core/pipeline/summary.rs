//! Run summary and reporting
//!
//! This module defines structures for tracking and reporting the outcome of a
//! pipeline run.

use crate::core::pipeline::step::PipelineStep;
use crate::domain::PipelineError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Status of one step within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    Failed,
    /// Not started because an earlier step failed or shutdown was requested
    Skipped,
}

/// Outcome of one step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: PipelineStep,

    pub status: StepStatus,

    /// Rows written by the step, when it succeeded
    pub rows: Option<u64>,

    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Error message, when the step failed
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn succeeded(step: PipelineStep, rows: u64, duration: Duration) -> Self {
        Self {
            step,
            status: StepStatus::Succeeded,
            rows: Some(rows),
            duration,
            error: None,
        }
    }

    pub fn failed(step: PipelineStep, error: &PipelineError, duration: Duration) -> Self {
        Self {
            step,
            status: StepStatus::Failed,
            rows: None,
            duration,
            error: Some(error.to_string()),
        }
    }

    pub fn skipped(step: PipelineStep) -> Self {
        Self {
            step,
            status: StepStatus::Skipped,
            rows: None,
            duration: Duration::ZERO,
            error: None,
        }
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Summary of a pipeline run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Unique identifier of the run, also attached to its log lines
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// One outcome per executed or skipped step, in order
    pub steps: Vec<StepOutcome>,

    /// Total duration of the run
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Whether the run stopped early on a shutdown request
    pub interrupted: bool,

    /// The error that halted the run
    #[serde(skip)]
    pub error: Option<PipelineError>,
}

impl RunSummary {
    /// Create a new empty run summary
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            steps: Vec::new(),
            duration: Duration::ZERO,
            interrupted: false,
            error: None,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn record(&mut self, outcome: StepOutcome) {
        self.steps.push(outcome);
    }

    /// Check if every step succeeded
    pub fn is_successful(&self) -> bool {
        self.error.is_none()
            && !self.interrupted
            && self
                .steps
                .iter()
                .all(|outcome| outcome.status == StepStatus::Succeeded)
    }

    /// The step that halted the run, if any
    pub fn failed_step(&self) -> Option<PipelineStep> {
        self.steps
            .iter()
            .find(|outcome| outcome.status == StepStatus::Failed)
            .map(|outcome| outcome.step)
    }

    /// Whether `step` ran and succeeded in this run
    pub fn step_succeeded(&self, step: PipelineStep) -> bool {
        self.steps
            .iter()
            .any(|outcome| outcome.step == step && outcome.status == StepStatus::Succeeded)
    }

    /// Rows written by a step, if it ran
    pub fn rows(&self, step: PipelineStep) -> Option<u64> {
        self.steps
            .iter()
            .find(|outcome| outcome.step == step)
            .and_then(|outcome| outcome.rows)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        if self.is_successful() {
            tracing::info!(
                run_id = %self.run_id,
                extracted = self.rows(PipelineStep::Extract),
                staged = self.rows(PipelineStep::LoadToStaging),
                merged = self.rows(PipelineStep::MergeToTarget),
                duration_ms = self.duration.as_millis() as u64,
                "Run completed"
            );
            return;
        }

        if self.interrupted {
            tracing::warn!(run_id = %self.run_id, "Run interrupted before completion");
        }
        if let (Some(step), Some(error)) = (self.failed_step(), &self.error) {
            tracing::error!(
                run_id = %self.run_id,
                step = %step,
                error = %error,
                duration_ms = self.duration.as_millis() as u64,
                "Run failed"
            );
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
