use anyhow::Result;
use clap::Parser;
use mdpad::{
    app::config::Config,
    cli::{self, Cli},
    tui::run_tui,
};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbose flag and config override
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(cli::error::exit_code_for_usage(&e));
    });

    // Set config directory override before anything resolves paths
    if let Some(ref config_dir) = cli.config {
        mdpad::util::paths::set_config_dir_override(Some(config_dir.clone()));
    }

    // Get logs directory (creates if needed)
    let logs_dir = mdpad::util::paths::get_logs_dir().unwrap_or_else(|_| PathBuf::from("."));
    std::fs::create_dir_all(&logs_dir).ok();

    // Set up daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "app.jsonl");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Set log level based on verbose flag
    let log_level = if cli.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };

    // Initialize logging with JSON format for structured logs
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(
                    log_level,
                )),
        )
        .init();

    tracing::info!("Starting mdpad...");
    if cli.verbose {
        tracing::info!("Verbose logging enabled (TRACE level)");
    }
    tracing::trace!("CLI arguments: {:?}", cli);
    if let Some(ref config_dir) = cli.config {
        tracing::info!("Using config directory override: {:?}", config_dir);
    }

    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {:#}", e);
            eprintln!("Warning: {:#}. Using default settings.", e);
            Config::default()
        }
    };
    tracing::info!("Config loaded: {:?}", config);

    // Route based on CLI arguments
    match cli.command {
        Some(command) => {
            // CLI mode - handle command and exit
            let exit_code = cli::handler::handle_command(command, &config);
            drop(_guard);
            std::process::exit(exit_code);
        }
        None => run_tui(config, cli.file)?,
    }

    Ok(())
}
