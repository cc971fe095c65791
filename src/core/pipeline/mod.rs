//! The extract, stage and merge pipeline
//!
//! - [`Extractor`] copies the projected source table into the intermediate file
//! - [`StagingLoader`] hashes, relabels and bulk-inserts those rows into staging
//! - [`MergeDeduplicator`] appends staging rows whose hash the target lacks
//! - [`Pipeline`] runs them in order and reports a [`RunSummary`]

pub mod extract;
pub mod merge;
pub mod runner;
pub mod staging;
pub mod step;
pub mod summary;

pub use extract::Extractor;
pub use merge::MergeDeduplicator;
pub use runner::Pipeline;
pub use staging::StagingLoader;
pub use step::PipelineStep;
pub use summary::{RunSummary, StepOutcome, StepStatus};
