//! Gaia map generation server.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod protocol;
mod server;

use config::ServerConfig;
use server::ServerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail on bad configuration before binding
    let config = ServerConfig::from_env()?;
    let layout = config.load_layout()?;

    info!(
        max_iterations = config.generator.max_iterations,
        custom_catalog = config.catalog_path.is_some(),
        "Starting Gaia map server..."
    );

    let state = Arc::new(ServerState::new(layout, config.generator));

    server::run_server(config.addr, state).await
}
