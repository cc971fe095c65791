//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ConnectionConfig, DwhSyncConfig};
use super::secret::secret_string;
use crate::domain::errors::PipelineError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DwhSyncConfig
/// 4. Applies environment variable overrides (DWHSYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`PipelineError::Configuration`] if any of those steps fails.
///
/// # Examples
///
/// ```no_run
/// use dwhsync::config::loader::load_config;
///
/// let config = load_config("dwhsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DwhSyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PipelineError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PipelineError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: DwhSyncConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PipelineError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched. Every missing variable is reported at once.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PipelineError::Configuration(e.to_string()))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let replaced = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        lines.push(replaced.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(PipelineError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the DWHSYNC_* prefix
///
/// Variables follow the pattern DWHSYNC_<SECTION>_<KEY>, for example
/// DWHSYNC_SOURCE_HOST or DWHSYNC_SCHEDULE_INTERVAL_SECONDS. Values that do not
/// parse are ignored.
fn apply_env_overrides(config: &mut DwhSyncConfig) {
    if let Ok(val) = std::env::var("DWHSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    override_connection("DWHSYNC_SOURCE", &mut config.source.connection);
    if let Ok(val) = std::env::var("DWHSYNC_SOURCE_SCHEMA") {
        config.source.schema = val;
    }
    if let Ok(val) = std::env::var("DWHSYNC_SOURCE_TABLE") {
        config.source.table = val;
    }

    override_connection("DWHSYNC_WAREHOUSE", &mut config.warehouse.connection);
    if let Ok(val) = std::env::var("DWHSYNC_WAREHOUSE_STAGING_TABLE") {
        config.warehouse.staging_table = val;
    }
    if let Ok(val) = std::env::var("DWHSYNC_WAREHOUSE_TARGET_TABLE") {
        config.warehouse.target_table = val;
    }
    if let Some(size) = parsed_env("DWHSYNC_WAREHOUSE_BATCH_SIZE") {
        config.warehouse.batch_size = size;
    }

    if let Ok(val) = std::env::var("DWHSYNC_INTERMEDIATE_FOLDER") {
        config.intermediate.folder = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("DWHSYNC_INTERMEDIATE_FILE_NAME") {
        config.intermediate.file_name = val;
    }

    if let Some(interval) = parsed_env("DWHSYNC_SCHEDULE_INTERVAL_SECONDS") {
        config.schedule.interval_seconds = interval;
    }
    if let Some(depends) = parsed_env("DWHSYNC_SCHEDULE_DEPENDS_ON_PAST") {
        config.schedule.depends_on_past = depends;
    }

    if let Some(enabled) = parsed_env("DWHSYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("DWHSYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

fn override_connection(prefix: &str, connection: &mut ConnectionConfig) {
    if let Ok(val) = std::env::var(format!("{prefix}_HOST")) {
        connection.host = val;
    }
    if let Some(port) = parsed_env(&format!("{prefix}_PORT")) {
        connection.port = port;
    }
    if let Ok(val) = std::env::var(format!("{prefix}_DBNAME")) {
        connection.dbname = val;
    }
    if let Ok(val) = std::env::var(format!("{prefix}_USER")) {
        connection.user = val;
    }
    if let Ok(val) = std::env::var(format!("{prefix}_PASSWORD")) {
        connection.password = secret_string(val);
    }
}

fn parsed_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.parse().ok())
}
