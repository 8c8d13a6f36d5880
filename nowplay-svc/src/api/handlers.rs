//! HTTP request handlers
//!
//! Implements the now-playing endpoints over the shared store.

use crate::api::server::AppContext;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
pub struct NowPlayingResponse {
    title: String,
    artist: String,
    source: String,
}

/// Flat update body
///
/// The wire contract is a flat JSON object of string fields. Missing keys
/// default to empty strings and unrecognized keys are ignored; anything
/// that does not read as this shape is a processing failure.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    source: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /nowplaying - Accept a now-playing update
///
/// The body is parsed here rather than by an extractor so that parse
/// failures surface as the documented 500 with the escaped message, and
/// leave the stored state untouched.
pub async fn update_nowplaying(
    State(ctx): State<AppContext>,
    body: String,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let req: UpdateRequest = serde_json::from_str(&body).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    ctx.store.update(&req.title, &req.artist, &req.source).await;
    debug!(
        "Now playing updated via local endpoint: {} — {}",
        req.artist, req.title
    );

    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

/// GET /nowplaying - Current state as a flat JSON object
pub async fn get_nowplaying(State(ctx): State<AppContext>) -> Json<NowPlayingResponse> {
    let snap = ctx.store.snapshot().await;
    Json(NowPlayingResponse {
        title: snap.title,
        artist: snap.artist,
        source: snap.source,
    })
}

/// POST /clear - Reset the current state
pub async fn clear(State(ctx): State<AppContext>) -> Json<StatusResponse> {
    ctx.store.clear().await;
    debug!("Now playing cleared via local endpoint");
    Json(StatusResponse {
        status: "cleared".to_string(),
    })
}

/// Fallback for unsupported methods on known paths
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "method_not_allowed".to_string(),
        }),
    )
}
