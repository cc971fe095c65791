// dwhsync - Source database to warehouse ETL
// Copyright (c) 2025 dwhsync Contributors
// Licensed under the MIT License

//! # dwhsync - source database to warehouse ETL
//!
//! dwhsync moves the rows of a source table into a warehouse table on a
//! recurring schedule, deduplicating them by content hash.
//!
//! ## Overview
//!
//! A run has three strictly sequential steps:
//! - **Extract** the source table, projected to the mapped fields, into an
//!   intermediate delimiter-separated file
//! - **Load to staging**: hash every row, relabel its fields and bulk-insert it
//!   into a staging table
//! - **Merge to target**: append the staging rows whose hash the target table
//!   does not already hold
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline steps, run orchestration, row hash and scheduler
//! - [`adapters`] - PostgreSQL and in-memory stores, intermediate file
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dwhsync::config::load_config;
//! use dwhsync::core::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("dwhsync.toml")?;
//!     let pipeline = Pipeline::from_config(&config)?;
//!
//!     let summary = pipeline.run().await;
//!     summary.log_summary();
//!     Ok(())
//! }
//! ```
//!
//! ## Deduplication
//!
//! The hash covers the full ordered tuple of source values, so an unchanged
//! row is never inserted twice into the target, while a changed row is added
//! as a new row next to its previous version. Target rows are never updated.
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], whose error type is
//! [`domain::PipelineError`]. A failing step halts the run:
//!
//! ```rust,no_run
//! use dwhsync::core::pipeline::{Pipeline, PipelineStep};
//! use dwhsync::domain::PipelineError;
//!
//! # async fn example(pipeline: &Pipeline) {
//! match pipeline.run_step(PipelineStep::LoadToStaging).await {
//!     Ok(rows) => println!("staged {rows} rows"),
//!     Err(PipelineError::MissingIntermediateData { path }) => {
//!         eprintln!("{} is missing, run extract first", path.display())
//!     }
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
