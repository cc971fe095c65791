//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they do not
//! interfere with each other.

use dwhsync::config::load_config;
use dwhsync::domain::{PipelineError, TableRef};
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for var in [
        "DWHSYNC_APPLICATION_LOG_LEVEL",
        "DWHSYNC_SOURCE_HOST",
        "DWHSYNC_SOURCE_PASSWORD",
        "DWHSYNC_WAREHOUSE_PORT",
        "DWHSYNC_WAREHOUSE_BATCH_SIZE",
        "DWHSYNC_INTERMEDIATE_FOLDER",
        "DWHSYNC_SCHEDULE_INTERVAL_SECONDS",
        "DWHSYNC_SCHEDULE_DEPENDS_ON_PAST",
        "TEST_SOURCE_DB_PASSWORD",
        "TEST_DWH_DB_PASSWORD",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

const MINIMAL_CONFIG: &str = r#"
[source]
host = "192.168.1.42"
dbname = "sky_eng_source"
user = "postgres"
password = "postgres"
table = "order"

[warehouse]
host = "192.168.1.42"
dbname = "sky_eng_dwh"
user = "postgres"
password = "postgres"
staging_table = "raw_order_temp"
target_table = "raw_order"

[intermediate]
folder = "/tmp/dwhsync"

[mapping]
fields = [
    { target = "id" },
    { source = "id", target = "order_id" },
    { source = "stage", target = "stage" },
    { target = "row_hash" },
]
"#;

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[application]
log_level = "debug"

[source]
host = "source.internal"
port = 6432
dbname = "sky_eng_source"
user = "reader"
password = "reader-pass"
connect_timeout_seconds = 5
max_connections = 2
schema = "sales"
table = "order"

[warehouse]
host = "dwh.internal"
dbname = "sky_eng_dwh"
user = "loader"
password = "loader-pass"
staging_schema = "stage"
staging_table = "raw_order_temp"
target_schema = "core"
target_table = "raw_order"
batch_size = 250

[intermediate]
folder = "/data/dwhsync"
file_name = "orders.csv"
delimiter = "|"

[mapping]
hash_column = "content_hash"
fields = [
    { target = "id" },
    { source = "id", target = "order_id" },
    { source = "comment" },
    { target = "content_hash" },
]

[schedule]
interval_seconds = 600
depends_on_past = false

[logging]
local_enabled = true
local_path = "/tmp/dwhsync-logs"
local_rotation = "hourly"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.source.connection.port, 6432);
    assert_eq!(config.source.connection.connect_timeout_seconds, 5);
    assert_eq!(config.source.table_ref(), TableRef::new("sales", "order"));
    assert_eq!(
        config.warehouse.staging_table_ref(),
        TableRef::new("stage", "raw_order_temp")
    );
    assert_eq!(
        config.warehouse.target_table_ref(),
        TableRef::new("core", "raw_order")
    );
    assert_eq!(config.warehouse.batch_size, 250);
    assert_eq!(
        config.intermediate.path(),
        PathBuf::from("/data/dwhsync/orders.csv")
    );
    assert_eq!(config.intermediate.delimiter_byte(), Some(b'|'));

    let mapping = config.mapping.field_mapping();
    assert_eq!(mapping.source_columns(), ["id", "comment"]);
    assert_eq!(mapping.target_columns(), ["id", "order_id", "content_hash"]);

    assert_eq!(config.schedule.interval_seconds, 600);
    assert!(!config.schedule.depends_on_past);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(MINIMAL_CONFIG);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.source.connection.port, 5432);
    assert_eq!(config.source.schema, "public");
    assert_eq!(config.warehouse.staging_schema, "public");
    assert_eq!(config.warehouse.batch_size, 1000);
    assert_eq!(config.intermediate.file_name, "raw_data.csv");
    assert_eq!(config.intermediate.delimiter, ";");
    assert_eq!(config.mapping.hash_column, "row_hash");
    assert_eq!(config.schedule.interval_seconds, 3600);
    assert!(config.schedule.depends_on_past);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_SOURCE_DB_PASSWORD", "source_secret");
    std::env::set_var("TEST_DWH_DB_PASSWORD", "dwh_secret");

    let toml_content = MINIMAL_CONFIG
        .replacen(
            "password = \"postgres\"",
            "password = \"${TEST_SOURCE_DB_PASSWORD}\"",
            1,
        )
        .replacen(
            "password = \"postgres\"",
            "password = \"${TEST_DWH_DB_PASSWORD}\"",
            1,
        );

    let temp_file = write_config(&toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(
        config.source.connection.password.expose_secret().as_str(),
        "source_secret"
    );
    assert_eq!(
        config.warehouse.connection.password.expose_secret().as_str(),
        "dwh_secret"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = MINIMAL_CONFIG.replacen(
        "password = \"postgres\"",
        "password = \"${TEST_SOURCE_DB_PASSWORD}\"",
        1,
    );

    let temp_file = write_config(&toml_content);
    let err = load_config(temp_file.path()).unwrap_err();

    assert!(matches!(err, PipelineError::Configuration(_)));
    assert!(err.to_string().contains("TEST_SOURCE_DB_PASSWORD"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("DWHSYNC_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("DWHSYNC_SOURCE_HOST", "replica.internal");
    std::env::set_var("DWHSYNC_SOURCE_PASSWORD", "from-env");
    std::env::set_var("DWHSYNC_WAREHOUSE_PORT", "6543");
    std::env::set_var("DWHSYNC_WAREHOUSE_BATCH_SIZE", "5000");
    std::env::set_var("DWHSYNC_INTERMEDIATE_FOLDER", "/srv/dwhsync");
    std::env::set_var("DWHSYNC_SCHEDULE_INTERVAL_SECONDS", "60");
    std::env::set_var("DWHSYNC_SCHEDULE_DEPENDS_ON_PAST", "false");

    let temp_file = write_config(MINIMAL_CONFIG);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.source.connection.host, "replica.internal");
    assert_eq!(
        config.source.connection.password.expose_secret().as_str(),
        "from-env"
    );
    assert_eq!(config.warehouse.connection.port, 6543);
    assert_eq!(config.warehouse.batch_size, 5000);
    assert_eq!(
        config.intermediate.path(),
        PathBuf::from("/srv/dwhsync/raw_data.csv")
    );
    assert_eq!(config.schedule.interval_seconds, 60);
    assert!(!config.schedule.depends_on_past);

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let invalid = [
        MINIMAL_CONFIG.replace("[source]", "[application]\nlog_level = \"verbose\"\n\n[source]"),
        MINIMAL_CONFIG.replace("folder = \"/tmp/dwhsync\"", "folder = \"/tmp/dwhsync\"\ndelimiter = \";;\""),
        MINIMAL_CONFIG.replace("    { target = \"row_hash\" },\n", ""),
        MINIMAL_CONFIG.replace("target_table = \"raw_order\"", "target_table = \"raw_order_temp\""),
        MINIMAL_CONFIG.replace(
            "    { source = \"id\", target = \"order_id\" },\n    { source = \"stage\", target = \"stage\" },\n",
            "",
        ),
    ];

    for content in invalid {
        let temp_file = write_config(&content);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            matches!(err, PipelineError::Configuration(_)),
            "expected configuration error for:\n{content}"
        );
    }
}

#[test]
fn test_missing_config_file() {
    let err = load_config("/nonexistent/dwhsync.toml").unwrap_err();
    assert!(err.to_string().contains("not found"));
}
