//! Result type alias for dwhsync

use super::errors::PipelineError;

/// Result type alias for pipeline operations
///
/// # Examples
///
/// ```
/// use dwhsync::domain::result::Result;
/// use dwhsync::domain::errors::PipelineError;
///
/// fn staged_rows() -> Result<usize> {
///     Ok(2)
/// }
///
/// fn missing_store() -> Result<()> {
///     Err(PipelineError::Store("relation does not exist".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PipelineError>;
