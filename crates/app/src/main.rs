mod browse;
mod cli;
mod commands;
mod config;
mod render;
mod state;
mod wiring;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::ConfigError;
use crate::wiring::WiringError;
use opinions_core::error::{CoreError, FetchError};
use opinions_core::params::Location;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("wiring error: {0}")]
    Wiring(#[from] WiringError),
    #[error("invalid input: {0}")]
    Input(#[from] CoreError),
    #[error("request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("{0} unavailable")]
    Unavailable(&'static str),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    config::load_dotenv()?;
    let config = config::AppConfig::from_env()?;
    info!(api_base = %config.api_base, "opinions starting");

    let result = run(cli, config).await;
    if let Err(err) = &result {
        error!(error = %err, "command failed");
    }
    result
}

async fn run(cli: Cli, config: config::AppConfig) -> Result<(), AppError> {
    let state = wiring::build_state(config)?;
    match cli.command {
        Command::Search(args) => commands::search(&state, &args).await,
        Command::Open { id, json } => commands::open(&state, &id, json).await,
        Command::Filters { json } => commands::filters(&state, json).await,
        Command::Health => commands::health(&state).await,
        Command::Browse { location } => {
            let location = location.as_deref().map(Location::parse).unwrap_or_default();
            browse::run(state, location).await
        }
    }
}
