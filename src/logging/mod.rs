//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Console output for interactive use
//! - JSON-formatted local log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use dwhsync::logging::init_logging;
//! use dwhsync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a pipeline step
///
/// # Example
///
/// ```no_run
/// use dwhsync::core::pipeline::PipelineStep;
/// use dwhsync::log_step_start;
///
/// let run_id = uuid::Uuid::new_v4();
/// log_step_start!(run_id, PipelineStep::Extract);
/// ```
#[macro_export]
macro_rules! log_step_start {
    ($run_id:expr, $step:expr) => {
        tracing::info!(
            run_id = %$run_id,
            step = %$step,
            "Starting step"
        );
    };
}

/// Log the successful completion of a pipeline step
///
/// # Example
///
/// ```no_run
/// use dwhsync::core::pipeline::PipelineStep;
/// use dwhsync::log_step_complete;
/// use std::time::Duration;
///
/// let run_id = uuid::Uuid::new_v4();
/// log_step_complete!(run_id, PipelineStep::MergeToTarget, 42u64, Duration::from_secs(1));
/// ```
#[macro_export]
macro_rules! log_step_complete {
    ($run_id:expr, $step:expr, $rows:expr, $duration:expr) => {
        tracing::info!(
            run_id = %$run_id,
            step = %$step,
            rows = $rows,
            duration_ms = $duration.as_millis() as u64,
            "Step completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use dwhsync::log_error_with_context;
/// use dwhsync::domain::PipelineError;
///
/// let error = PipelineError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
