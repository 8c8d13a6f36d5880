//! Now-playing service - main entry point
//!
//! Runs the loopback HTTP endpoint and the Last.fm poller over one shared
//! store. Embedding hosts link against the library instead and drive the
//! same pieces from their own lifecycle hooks.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nowplay_common::config::{default_config_path, ServiceConfig};
use nowplay_svc::api::LocalServer;
use nowplay_svc::config::{Config, DEFAULT_POLL_PERIOD_SECS, DEFAULT_PORT};
use nowplay_svc::poller::LastFmPoller;
use nowplay_svc::state::NowPlayingStore;

/// Command-line arguments for nowplay-svc
#[derive(Parser, Debug)]
#[command(name = "nowplay-svc")]
#[command(about = "Local now-playing state service")]
#[command(version)]
struct Args {
    /// Port for the loopback HTTP endpoint
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "NOWPLAY_PORT")]
    port: u16,

    /// Last.fm username to poll
    #[arg(long, env = "LASTFM_USERNAME")]
    lastfm_username: Option<String>,

    /// Last.fm API key; empty leaves the poller disabled
    #[arg(long, env = "LASTFM_API_KEY")]
    lastfm_api_key: Option<String>,

    /// Poll period in seconds (clamped to a 5 second minimum)
    #[arg(long, default_value_t = DEFAULT_POLL_PERIOD_SECS)]
    poll_period_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nowplay_svc=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let file = ServiceConfig::load_or_default(&default_config_path());
    let config = Config::resolve(
        args.port,
        args.lastfm_username,
        args.lastfm_api_key,
        args.poll_period_secs,
        &file,
    );

    info!("Starting now-playing service on port {}", config.port);

    let store = Arc::new(NowPlayingStore::new());

    // The server and the poller are independent producers; a bind failure
    // leaves the poller (and an embedding host) fully functional.
    let server = LocalServer::new(Arc::clone(&store));
    if let Err(e) = server.start_if_not_running(config.port).await {
        error!("Failed to start now-playing HTTP server: {}", e);
    }

    let poller = LastFmPoller::new(Arc::clone(&store))?;
    poller
        .start(
            &config.lastfm_api_key,
            &config.lastfm_username,
            config.poll_period,
        )
        .await;

    shutdown_signal().await;
    info!("Shutting down");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
