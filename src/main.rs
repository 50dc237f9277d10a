//! Signal engine CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use edge_config::load_config;
use edge_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration from the environment".to_string(),
    })?;

    // Setup logging
    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    setup_logging(&log_level, cli.json_logs || config.logging.is_json())?;

    // Execute command
    match cli.command {
        Commands::Replay(args) => cli::commands::replay::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&config, cli.config.as_deref()),
        Commands::DefaultConfig => cli::commands::default_config::run(),
    }
}
