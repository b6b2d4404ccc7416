//! dataset-registry CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;

use args::{Cli, Commands, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = cli.log_level.as_deref().unwrap_or("warn");
    init_logging(log_level, cli.log_format)?;

    // Execute command
    match cli.command {
        Commands::Lookup(args) => commands::lookup::execute(args, cli.config).await,
        Commands::Validate(args) => commands::validate::execute(args, cli.config).await,
        Commands::Duplicates(args) => commands::duplicates::execute(args, cli.config).await,
        Commands::Enrich(args) => commands::enrich::execute(args, cli.config).await,
        Commands::Resolve(args) => commands::resolve::execute(args).await,
        Commands::Import10x(args) => commands::import::execute(args, cli.config).await,
        Commands::Config(args) => commands::config::execute(args).await,
    }
}

fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    // stdout carries command output; logs go to stderr
    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    Ok(())
}
