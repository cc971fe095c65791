//! Domain models and types for dwhsync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Field mapping** ([`FieldMapping`], [`FieldPair`]) between source and warehouse names
//! - **Row values** ([`RawRecord`], [`StagingBatch`]) carried as opaque text
//! - **Table references** ([`TableRef`])
//! - **Error types** ([`PipelineError`]) and the [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use dwhsync::domain::{FieldMapping, FieldPair};
//!
//! let mapping = FieldMapping::new(vec![
//!     FieldPair::target_only("id"),
//!     FieldPair::mapped("id", "order_id"),
//!     FieldPair::target_only("row_hash"),
//! ]);
//!
//! assert_eq!(mapping.source_columns(), ["id"]);
//! assert_eq!(mapping.target_columns(), ["id", "order_id", "row_hash"]);
//! ```

pub mod errors;
pub mod mapping;
pub mod record;
pub mod result;
pub mod table;

pub use errors::PipelineError;
pub use mapping::{FieldMapping, FieldPair};
pub use record::{RawRecord, StagingBatch, Value};
pub use result::Result;
pub use table::TableRef;
