//! Configuration schema types
//!
//! This module defines the configuration structure for dwhsync. The whole
//! value is immutable once loaded; each pipeline component receives only the
//! section it needs.

use crate::config::SecretString;
use crate::domain::{FieldMapping, FieldPair, TableRef};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main dwhsync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct DwhSyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Source database and table
    pub source: SourceConfig,

    /// Warehouse database with staging and target tables
    pub warehouse: WarehouseConfig,

    /// Intermediate file written by extraction
    pub intermediate: IntermediateConfig,

    /// Source-to-target field mapping
    pub mapping: MappingConfig,

    /// Recurring schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DwhSyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value found
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.warehouse.validate()?;
        self.intermediate.validate()?;
        self.mapping.validate()?;
        self.schedule.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Connection parameters shared by the source and warehouse sections
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Database host
    pub host: String,

    /// Database port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name
    pub dbname: String,

    /// Database user
    pub user: String,

    /// Database password
    /// Stored securely in memory and automatically zeroized on drop
    pub password: SecretString,

    /// Timeout for establishing a connection, in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

impl ConnectionConfig {
    fn validate(&self, section: &str) -> Result<(), String> {
        if self.host.is_empty() {
            return Err(format!("{section}.host cannot be empty"));
        }
        if self.port == 0 {
            return Err(format!("{section}.port must be > 0"));
        }
        if self.dbname.is_empty() {
            return Err(format!("{section}.dbname cannot be empty"));
        }
        if self.user.is_empty() {
            return Err(format!("{section}.user cannot be empty"));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(format!("{section}.connect_timeout_seconds must be > 0"));
        }
        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(format!(
                "{section}.max_connections must be between 1 and 100, got {}",
                self.max_connections
            ));
        }
        Ok(())
    }

    /// Connection target without credentials, safe for logs
    pub fn display_safe(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.dbname)
    }
}

/// Source database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(flatten)]
    pub connection: ConnectionConfig,

    /// Schema of the source table
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Source table name
    pub table: String,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        self.connection.validate("source")?;
        if self.schema.is_empty() || self.table.is_empty() {
            return Err("source.schema and source.table cannot be empty".to_string());
        }
        Ok(())
    }

    pub fn table_ref(&self) -> TableRef {
        TableRef::new(&self.schema, &self.table)
    }
}

/// Warehouse database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    #[serde(flatten)]
    pub connection: ConnectionConfig,

    /// Schema of the staging table
    #[serde(default = "default_schema")]
    pub staging_schema: String,

    /// Staging table name
    pub staging_table: String,

    /// Schema of the target table
    #[serde(default = "default_schema")]
    pub target_schema: String,

    /// Target table name
    pub target_table: String,

    /// Rows per INSERT statement when loading the staging table
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl WarehouseConfig {
    fn validate(&self) -> Result<(), String> {
        self.connection.validate("warehouse")?;
        if self.staging_table.is_empty() || self.staging_schema.is_empty() {
            return Err(
                "warehouse.staging_schema and warehouse.staging_table cannot be empty".to_string(),
            );
        }
        if self.target_table.is_empty() || self.target_schema.is_empty() {
            return Err(
                "warehouse.target_schema and warehouse.target_table cannot be empty".to_string(),
            );
        }
        if self.staging_table_ref() == self.target_table_ref() {
            return Err("warehouse staging and target tables must differ".to_string());
        }
        if self.batch_size == 0 || self.batch_size > 50_000 {
            return Err(format!(
                "warehouse.batch_size must be between 1 and 50000, got {}",
                self.batch_size
            ));
        }
        Ok(())
    }

    pub fn staging_table_ref(&self) -> TableRef {
        TableRef::new(&self.staging_schema, &self.staging_table)
    }

    pub fn target_table_ref(&self) -> TableRef {
        TableRef::new(&self.target_schema, &self.target_table)
    }
}

/// Intermediate file configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IntermediateConfig {
    /// Folder holding the intermediate file; created on extraction if missing
    pub folder: PathBuf,

    /// File name inside `folder`
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Single ASCII character separating fields
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl IntermediateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.folder.as_os_str().is_empty() {
            return Err("intermediate.folder cannot be empty".to_string());
        }
        if self.file_name.is_empty() {
            return Err("intermediate.file_name cannot be empty".to_string());
        }
        if self.delimiter_byte().is_none() {
            return Err(format!(
                "intermediate.delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ));
        }
        Ok(())
    }

    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }

    /// The delimiter as a byte, if it is exactly one ASCII character
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Some(*b),
            _ => None,
        }
    }
}

/// Field mapping configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MappingConfig {
    /// Target-only field receiving the row hash
    #[serde(default = "default_hash_column")]
    pub hash_column: String,

    /// Ordered field pairs
    pub fields: Vec<FieldPair>,
}

impl MappingConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(position) = self.fields.iter().position(|p| !p.is_valid()) {
            return Err(format!(
                "mapping.fields[{position}] must have a source or a target"
            ));
        }
        let mapping = self.field_mapping();
        if mapping.source_columns().is_empty() {
            return Err("mapping.fields must contain at least one source field".to_string());
        }
        if !mapping.is_target_only(&self.hash_column) {
            return Err(format!(
                "mapping.hash_column '{}' must be a target-only field in mapping.fields",
                self.hash_column
            ));
        }
        Ok(())
    }

    pub fn field_mapping(&self) -> FieldMapping {
        FieldMapping::new(self.fields.clone())
    }
}

/// Recurring schedule configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between run starts
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Stop scheduling once a run fails
    #[serde(default = "default_true")]
    pub depends_on_past: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            depends_on_past: true,
        }
    }
}

impl ScheduleConfig {
    fn validate(&self) -> Result<(), String> {
        if self.interval_seconds == 0 {
            return Err("schedule.interval_seconds must be > 0".to_string());
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a local rolling file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "logging.local_rotation must be one of: {}, got '{}'",
                valid_rotations.join(", "),
                self.local_rotation
            ));
        }
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    5432
}

fn default_connect_timeout_seconds() -> u64 {
    30
}

fn default_max_connections() -> usize {
    4
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_batch_size() -> usize {
    1000
}

fn default_file_name() -> String {
    "raw_data.csv".to_string()
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_hash_column() -> String {
    "row_hash".to_string()
}

fn default_interval_seconds() -> u64 {
    3600
}

fn default_local_path() -> String {
    "/var/log/dwhsync".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn connection() -> ConnectionConfig {
        ConnectionConfig {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "dwh".to_string(),
            user: "postgres".to_string(),
            password: secret_string("postgres".to_string()),
            connect_timeout_seconds: 30,
            max_connections: 4,
        }
    }

    fn warehouse() -> WarehouseConfig {
        WarehouseConfig {
            connection: connection(),
            staging_schema: "public".to_string(),
            staging_table: "raw_order_temp".to_string(),
            target_schema: "public".to_string(),
            target_table: "raw_order".to_string(),
            batch_size: 1000,
        }
    }

    fn mapping() -> MappingConfig {
        MappingConfig {
            hash_column: "row_hash".to_string(),
            fields: vec![
                FieldPair::target_only("id"),
                FieldPair::mapped("id", "order_id"),
                FieldPair::target_only("row_hash"),
            ],
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connection_config_validation() {
        let mut config = connection();
        assert!(config.validate("source").is_ok());

        config.host = String::new();
        let err = config.validate("source").unwrap_err();
        assert!(err.contains("source.host"));

        let mut config = connection();
        config.max_connections = 0;
        assert!(config.validate("warehouse").is_err());
    }

    #[test]
    fn test_connection_display_safe_hides_password() {
        let config = connection();
        let display = config.display_safe();
        assert_eq!(display, "postgres@localhost:5432/dwh");
    }

    #[test]
    fn test_warehouse_tables_must_differ() {
        let mut config = warehouse();
        assert!(config.validate().is_ok());

        config.target_table = config.staging_table.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_warehouse_batch_size_bounds() {
        let mut config = warehouse();
        config.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_intermediate_path_and_delimiter() {
        let config = IntermediateConfig {
            folder: PathBuf::from("/tmp/sky_eng"),
            file_name: "temp_file.csv".to_string(),
            delimiter: ";".to_string(),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.path(), PathBuf::from("/tmp/sky_eng/temp_file.csv"));
        assert_eq!(config.delimiter_byte(), Some(b';'));
    }

    #[test]
    fn test_intermediate_rejects_multichar_delimiter() {
        let config = IntermediateConfig {
            folder: PathBuf::from("/tmp/sky_eng"),
            file_name: "temp_file.csv".to_string(),
            delimiter: "||".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mapping_requires_hash_column_as_target_only() {
        let mut config = mapping();
        assert!(config.validate().is_ok());

        config.hash_column = "order_id".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mapping_rejects_empty_pair() {
        let mut config = mapping();
        config.fields.push(FieldPair {
            source: None,
            target: None,
        });
        let err = config.validate().unwrap_err();
        assert!(err.contains("mapping.fields[3]"));
    }

    #[test]
    fn test_mapping_requires_a_source_field() {
        let config = MappingConfig {
            hash_column: "row_hash".to_string(),
            fields: vec![FieldPair::target_only("row_hash")],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_schedule_defaults() {
        let config = ScheduleConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(3600));
        assert!(config.depends_on_past);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
