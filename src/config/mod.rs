//! Configuration management for dwhsync.
//!
//! dwhsync reads a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DWHSYNC_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`SourceConfig`] - Source connection and table
//! - [`WarehouseConfig`] - Warehouse connection, staging and target tables
//! - [`IntermediateConfig`] - Location and delimiter of the intermediate file
//! - [`MappingConfig`] - Field pairs and the hash column
//! - [`ScheduleConfig`] - Run interval and failure blocking
//! - [`LoggingConfig`] - Optional JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! host = "192.168.1.42"
//! dbname = "sky_eng_source"
//! user = "postgres"
//! password = "${DWHSYNC_SOURCE_DB_PASSWORD}"
//! table = "order"
//!
//! [warehouse]
//! host = "192.168.1.42"
//! dbname = "sky_eng_dwh"
//! user = "postgres"
//! password = "${DWHSYNC_DWH_DB_PASSWORD}"
//! staging_table = "raw_order_temp"
//! target_table = "raw_order"
//!
//! [intermediate]
//! folder = "/var/lib/dwhsync"
//!
//! [mapping]
//! fields = [
//!     { target = "id" },
//!     { source = "id", target = "order_id" },
//!     { target = "row_hash" },
//! ]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ConnectionConfig, DwhSyncConfig, IntermediateConfig, LoggingConfig,
    MappingConfig, ScheduleConfig, SourceConfig, WarehouseConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
