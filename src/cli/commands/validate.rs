//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the dwhsync configuration file and, optionally, reaching both databases.

use crate::adapters::database::{create_stores, RelationalStore};
use crate::config::{load_config, DwhSyncConfig};
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also open a connection to the source and the warehouse
    #[arg(long)]
    pub check_connections: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        print_config_summary(&config);

        if !self.check_connections {
            return Ok(0);
        }

        let stores = match create_stores(&config) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let mut reachable = true;
        for store in [&stores.source, &stores.warehouse] {
            match check_connection(store.as_ref()).await {
                Ok(()) => println!("✅ {} reachable", store.name()),
                Err(e) => {
                    reachable = false;
                    println!("❌ {}: {e}", store.name());
                }
            }
        }
        println!();

        Ok(if reachable { 0 } else { 4 })
    }
}

fn print_config_summary(config: &DwhSyncConfig) {
    let mapping = config.mapping.field_mapping();

    println!();
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Source: {}", config.source.connection.display_safe());
    println!("  Source Table: {}", config.source.table_ref());
    println!("  Warehouse: {}", config.warehouse.connection.display_safe());
    println!("  Staging Table: {}", config.warehouse.staging_table_ref());
    println!("  Target Table: {}", config.warehouse.target_table_ref());
    println!("  Batch Size: {}", config.warehouse.batch_size);
    println!("  Intermediate File: {}", config.intermediate.path().display());
    println!("  Source Columns: {}", mapping.source_columns().join(", "));
    println!("  Target Columns: {}", mapping.target_columns().join(", "));
    println!("  Hash Column: {}", config.mapping.hash_column);
    println!("  Interval: {}s", config.schedule.interval_seconds);
    println!("  Depends On Past: {}", config.schedule.depends_on_past);
    println!();
}

async fn check_connection(store: &dyn RelationalStore) -> Result<()> {
    let mut conn = store.connect().await?;
    conn.ping().await
}
