//! habitgram backend - main entry point

use anyhow::{Context, Result};
use clap::Parser;
use habitgram_config::{Config, ConfigLoader, LoggingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path; falls back to environment variables only
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&config.level)
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    if config.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config: Config = match &args.config {
        Some(path) => ConfigLoader::load_config(path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => ConfigLoader::load_from_env().context("failed to load configuration from env")?,
    };

    init_logging(&config.logging);
    info!(bind = %config.server.bind_addr, "starting habitgram backend");

    app::run(config).await
}
