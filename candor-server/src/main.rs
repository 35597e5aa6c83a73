//! candor - interview orchestration server binary

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use candor_server::{CandorServer, ServerConfig};

#[derive(Parser)]
#[command(name = "candor", about = "Real-time interview orchestration server")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("candor={default_level}"))),
        )
        .init();

    let config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::from_env(),
    };

    if config.jwt_secret.is_empty() {
        anyhow::bail!("no JWT secret configured; set jwt_secret or CANDOR_JWT_SECRET");
    }
    if config.agent.api_key.is_empty() {
        anyhow::bail!("no API key configured; set agent.api_key or CANDOR_API_KEY");
    }

    CandorServer::new(config)
        .run()
        .await
        .context("server exited with an error")?;

    Ok(())
}
