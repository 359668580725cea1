//! Entry point: parse CLI and dispatch to operations.

use anyhow::Context;
use clap::Parser;
use sleeper_ffl::{
    cli::{Commands, Sleeper},
    commands, AppConfig, SleeperService,
};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let app = Sleeper::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&app.log_level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = Arc::new(AppConfig::from_env());
    let service = SleeperService::new(config).context("failed to build Sleeper HTTP client")?;

    let output = match app.command {
        Commands::Get { cmd } => commands::run(&service, cmd).await,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
