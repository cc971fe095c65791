//! CLI command implementations
//!
//! Every command returns the process exit code:
//! 0 success, 2 configuration error, 4 connection unavailable, 5 fatal error,
//! 130 interrupted.

pub mod init;
pub mod run;
pub mod schedule;
pub mod step;
pub mod validate;

use crate::domain::PipelineError;

/// Exit code for a failed operation
pub fn exit_code(error: &PipelineError) -> i32 {
    match error {
        PipelineError::Configuration(_) => 2,
        PipelineError::ConnectionUnavailable { .. } => 4,
        _ => 5,
    }
}
