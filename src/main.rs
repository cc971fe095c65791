// dwhsync - Source database to warehouse ETL
// Copyright (c) 2025 dwhsync Contributors
// Licensed under the MIT License

use clap::Parser;
use dwhsync::cli::{Cli, Commands};
use dwhsync::config::{load_config, LoggingConfig};
use dwhsync::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging and the default level come from the config file when it
    // loads; commands report a broken config themselves.
    let (config_level, logging_config) = match load_config(&cli.config) {
        Ok(config) => (Some(config.application.log_level), config.logging),
        Err(_) => (None, LoggingConfig::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "dwhsync - source database to warehouse ETL"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(wait_for_shutdown(shutdown_tx));

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // Flush the file writer before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Flip the shutdown channel on SIGINT or SIGTERM
///
/// The sender is never dropped: the scheduler reads a closed channel as a
/// shutdown request, so a handler that fails to install only disables that
/// signal.
async fn wait_for_shutdown(shutdown_tx: watch::Sender<bool>) {
    let signal = tokio::select! {
        Some(name) = sigint() => name,
        Some(name) = sigterm() => name,
        else => {
            tracing::warn!("No shutdown signal can be received");
            std::future::pending::<&'static str>().await
        }
    };
    request_shutdown(&shutdown_tx, signal);
    std::future::pending::<()>().await;
}

async fn sigint() -> Option<&'static str> {
    match tokio::signal::ctrl_c().await {
        Ok(()) => Some("SIGINT"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending().await
        }
    }
}

#[cfg(unix)]
async fn sigterm() -> Option<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await?;
            Some("SIGTERM")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGTERM handler");
            std::future::pending().await
        }
    }
}

#[cfg(not(unix))]
async fn sigterm() -> Option<&'static str> {
    std::future::pending().await
}

fn request_shutdown(shutdown_tx: &watch::Sender<bool>, signal: &str) {
    tracing::info!(signal = signal, "Shutdown requested, finishing current step");
    println!("\n⚠️  Shutdown signal received, finishing current step...");
    let _ = shutdown_tx.send(true);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::Step(args) => args.execute(&cli.config).await,
        Commands::Schedule(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
