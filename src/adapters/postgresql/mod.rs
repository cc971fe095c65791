//! PostgreSQL integration
//!
//! This module provides the PostgreSQL implementation of the relational store
//! traits, used for both the source database and the warehouse.

pub mod adapter;
pub mod client;
pub mod sql;

pub use adapter::PostgreSQLConnection;
pub use client::PostgreSQLStore;
