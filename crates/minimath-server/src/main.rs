//! Minimath progress backend
//!
//! Serves the player progress API over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use minimath_core::{Config, ProgressStore};
use minimath_server::AppState;

#[derive(Parser)]
#[command(name = "minimath-server")]
#[command(about = "Minimath - player progress backend")]
#[command(version)]
struct Args {
    /// Config file (defaults to ~/.config/minimath/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and MINIMATH_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("minimath_server=info,tower_http=info")),
        )
        .init();

    let mut config = match args.config {
        Some(ref path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(port) = args.port {
        config.port = port;
    }

    tracing::info!(
        port = config.port,
        data_dir = %config.data_dir.display(),
        "configuration loaded"
    );

    let store = match ProgressStore::open(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "failed to open progress store");
            std::process::exit(1);
        }
    };

    match store.player_count() {
        Ok(players) => tracing::info!(players, "progress store opened"),
        Err(e) => tracing::warn!(error = %e, "could not count saved players"),
    }

    let state = Arc::new(AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(%addr, "Backend running");

    minimath_server::serve(listener, state, shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
