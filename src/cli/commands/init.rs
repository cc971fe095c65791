//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "dwhsync.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your tables and field mapping", self.output);
                println!("  2. Set DWHSYNC_SOURCE_DB_PASSWORD and DWHSYNC_DWH_DB_PASSWORD");
                println!("     (or put them in a .env file)");
                println!("  3. Validate configuration: dwhsync validate-config --check-connections");
                println!("  4. Run once: dwhsync run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Sample configuration for the order table of the sky_eng source
    pub fn generate_config() -> String {
        r#"# dwhsync configuration
# Source table -> intermediate file -> warehouse staging -> warehouse target

[application]
log_level = "info"

[source]
host = "192.168.1.42"
port = 5432
dbname = "sky_eng_source"
user = "postgres"
password = "${DWHSYNC_SOURCE_DB_PASSWORD}"
schema = "public"
table = "order"

[warehouse]
host = "192.168.1.42"
port = 5432
dbname = "sky_eng_dwh"
user = "postgres"
password = "${DWHSYNC_DWH_DB_PASSWORD}"
staging_schema = "public"
staging_table = "raw_order_temp"
target_schema = "public"
target_table = "raw_order"
batch_size = 1000

[intermediate]
folder = "/var/lib/dwhsync"
file_name = "raw_data.csv"
delimiter = ";"

# Ordered field pairs. A pair without `source` is generated in the warehouse
# (identifier, hash); a pair without `target` is hashed but not staged.
[mapping]
hash_column = "row_hash"
fields = [
    { target = "id" },
    { source = "id", target = "order_id" },
    { source = "student_id", target = "student_id" },
    { source = "teacher_id", target = "teacher_id" },
    { source = "stage", target = "stage" },
    { source = "status", target = "status" },
    { source = "created_at", target = "created_at" },
    { source = "updated_at", target = "updated_at" },
    { target = "row_hash" },
]

[schedule]
interval_seconds = 3600
depends_on_past = true

[logging]
local_enabled = false
local_path = "/var/log/dwhsync"
local_rotation = "daily"
"#
        .to_string()
    }
}
