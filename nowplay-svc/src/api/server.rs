//! HTTP server setup and routing
//!
//! Sets up the Axum router for the now-playing endpoints and owns the
//! bind-once lifecycle of the loopback listener.

use crate::api::handlers;
use crate::error::{Error, Result};
use crate::state::NowPlayingStore;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<NowPlayingStore>,
}

/// Create the API router
///
/// Each route answers its documented method and falls back to a 405 with
/// `{"error":"method_not_allowed"}` for anything else.
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/nowplaying",
            get(handlers::get_nowplaying)
                .post(handlers::update_nowplaying)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/clear",
            post(handlers::clear).fallback(handlers::method_not_allowed),
        )
        .with_state(ctx)
}

/// Loopback HTTP server with idempotent startup
///
/// Multiple entry points may race to start the service; whichever call
/// binds first wins and every later call is a silent no-op. The server
/// task runs for the life of the process.
pub struct LocalServer {
    ctx: AppContext,
    listening: Mutex<Option<SocketAddr>>,
}

impl LocalServer {
    pub fn new(store: Arc<NowPlayingStore>) -> Self {
        Self {
            ctx: AppContext { store },
            listening: Mutex::new(None),
        }
    }

    /// Bind the loopback listener once and serve from a background task
    ///
    /// Returns Ok without rebinding when the server is already running.
    /// Bind failures are returned to the caller, which logs and continues.
    pub async fn start_if_not_running(&self, port: u16) -> Result<()> {
        let mut listening = self.listening.lock().await;
        if listening.is_some() {
            return Ok(());
        }

        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| Error::Http(format!("Failed to read local address: {}", e)))?;

        let app = create_router(self.ctx.clone());
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Now-playing HTTP server error: {}", e);
            }
        });

        info!("Now-playing HTTP server listening on http://{}", local_addr);
        *listening = Some(local_addr);
        Ok(())
    }

    /// Address the server is bound to, if running
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        *self.listening.lock().await
    }
}
