//! Domain error types
//!
//! This module defines the error hierarchy for dwhsync. Every pipeline step
//! returns these errors instead of unwinding, so the scheduler decides what a
//! failure means for the rest of the run. Third-party error types are converted
//! to strings at the boundary and never exposed.

use std::path::PathBuf;
use thiserror::Error;

/// Main dwhsync error type
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A relational store could not be reached when acquiring a connection
    #[error("Connection to {store} unavailable: {reason}")]
    ConnectionUnavailable { store: String, reason: String },

    /// The staging step found no extracted data
    #[error("Intermediate data not found at {}; re-run extraction", path.display())]
    MissingIntermediateData { path: PathBuf },

    /// Query or statement failure inside an established connection
    #[error("Store error: {0}")]
    Store(String),

    /// Reading or writing the intermediate file failed
    #[error("Intermediate store error: {0}")]
    IntermediateStore(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// A scheduled run was refused because a previous run failed
    #[error("Run blocked: {0}")]
    RunBlocked(String),
}

impl PipelineError {
    /// Shorthand for [`PipelineError::ConnectionUnavailable`]
    pub fn connection_unavailable(store: impl Into<String>, reason: impl ToString) -> Self {
        PipelineError::ConnectionUnavailable {
            store: store.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the failure happened before a connection was established
    pub fn is_connection_error(&self) -> bool {
        matches!(self, PipelineError::ConnectionUnavailable { .. })
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::IntermediateStore(err.to_string())
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        PipelineError::Configuration(format!("TOML parse error: {err}"))
    }
}
