//! External system integrations for dwhsync.
//!
//! - [`database`] - Relational store abstraction (trait-based) and factory
//! - [`postgresql`] - PostgreSQL implementation used for the source and the warehouse
//! - [`memory`] - In-process store with the same semantics, used by the test suite
//! - [`intermediate`] - Delimiter-separated file between extraction and staging
//!
//! # Example
//!
//! ```rust
//! use dwhsync::adapters::database::RelationalStore;
//! use dwhsync::adapters::memory::MemoryStore;
//! use dwhsync::domain::TableRef;
//!
//! # async fn example() -> dwhsync::domain::Result<()> {
//! let store = MemoryStore::new("source");
//! let table = TableRef::new("public", "order");
//! store.create_table(&table, &["id"], None)?;
//!
//! let mut conn = store.connect().await?;
//! let rows = conn.select(&table, &["id".to_string()]).await?;
//! assert!(rows.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod intermediate;
pub mod memory;
pub mod postgresql;
