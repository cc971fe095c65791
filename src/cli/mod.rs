//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for dwhsync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// dwhsync - source database to warehouse ETL
#[derive(Parser, Debug)]
#[command(name = "dwhsync")]
#[command(version, about, long_about = None)]
#[command(author = "dwhsync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "dwhsync.toml", env = "DWHSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DWHSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run extract, load_to_staging and merge_to_target once
    Run(commands::run::RunArgs),

    /// Run a single pipeline step
    Step(commands::step::StepArgs),

    /// Run the pipeline on the configured interval
    Schedule(commands::schedule::ScheduleArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::PipelineStep;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["dwhsync", "run"]);
        assert_eq!(cli.config, "dwhsync.toml");
        assert!(matches!(cli.command, Commands::Run(ref args) if !args.json));
    }

    #[test]
    fn test_cli_parse_run_json() {
        let cli = Cli::parse_from(["dwhsync", "run", "--json"]);
        assert!(matches!(cli.command, Commands::Run(ref args) if args.json));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["dwhsync", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["dwhsync", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_step() {
        let cli = Cli::parse_from(["dwhsync", "step", "merge_to_target"]);
        assert!(
            matches!(cli.command, Commands::Step(ref args) if args.step == PipelineStep::MergeToTarget)
        );
    }

    #[test]
    fn test_cli_parse_schedule() {
        let cli = Cli::parse_from(["dwhsync", "schedule", "--max-runs", "3"]);
        assert!(matches!(cli.command, Commands::Schedule(ref args) if args.max_runs == Some(3)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["dwhsync", "validate-config", "--check-connections"]);
        assert!(
            matches!(cli.command, Commands::ValidateConfig(ref args) if args.check_connections)
        );
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["dwhsync", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
