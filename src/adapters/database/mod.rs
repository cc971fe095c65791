//! Database abstraction layer
//!
//! This module provides a trait-based abstraction over relational stores so
//! the pipeline runs unchanged against PostgreSQL or the in-process
//! [`crate::adapters::memory`] store.

pub mod factory;
pub mod traits;

pub use factory::{create_stores, Stores};
pub use traits::{RelationalStore, StoreConnection};
