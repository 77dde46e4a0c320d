//! services/dashboard/src/bin/dashboard.rs

use clap::Parser;
use dashboard_lib::{cli::Cli, config::Config, error::DashboardError, state::AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(api_url = %config.api_url, "Configuration loaded");

    // --- 2. Build the Shared AppState ---
    let state = AppState::connect(config)?;

    // --- 3. Run the Command ---
    let cli = Cli::parse();
    dashboard_lib::cli::run(&state, cli).await
}
