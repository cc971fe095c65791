//! Core business logic for dwhsync.
//!
//! # Modules
//!
//! - [`pipeline`] - Extraction, staging load, merge and the run orchestration
//! - [`hash`] - Content hash identifying a source row across runs
//! - [`schedule`] - Interval scheduler with depends-on-past semantics
//!
//! # Run Workflow
//!
//! 1. **Extract**: Project the source table and overwrite the intermediate file
//! 2. **Stage**: Hash every row, relabel its fields and bulk-insert into staging
//! 3. **Merge**: Append staging rows whose hash the target table does not hold
//! 4. **Report**: Produce a [`pipeline::RunSummary`]
//!
//! # Example
//!
//! ```rust,no_run
//! use dwhsync::config::load_config;
//! use dwhsync::core::pipeline::Pipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("dwhsync.toml")?;
//! let pipeline = Pipeline::from_config(&config)?;
//!
//! let summary = pipeline.run().await;
//! println!("Successful: {}", summary.is_successful());
//! # Ok(())
//! # }
//! ```

pub mod hash;
pub mod pipeline;
pub mod schedule;
