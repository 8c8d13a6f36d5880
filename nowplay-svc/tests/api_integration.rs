//! Integration tests for the now-playing HTTP API
//!
//! Exercises the complete wire contract:
//! - Push/read roundtrip on /nowplaying
//! - Clearing via /clear
//! - Method and parse error surfaces
//! - Idempotent server startup on a real loopback socket

use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

use nowplay_svc::api::{create_router, AppContext, LocalServer};
use nowplay_svc::state::NowPlayingStore;

/// Test helper to create a router over a fresh store
fn setup_test_router() -> (axum::Router, Arc<NowPlayingStore>) {
    let store = Arc::new(NowPlayingStore::new());
    let router = create_router(AppContext {
        store: Arc::clone(&store),
    });
    (router, store)
}

/// Helper to make HTTP requests against the router
async fn make_request(
    app: &axum::Router,
    method: &str,
    path: &str,
    body: Option<String>,
) -> (StatusCode, Option<Value>) {
    use axum::body::Body;
    use http::{Method, Request};
    use tower::ServiceExt;

    let method: Method = method.parse().expect("Unsupported method");

    let mut request = Request::builder().method(method).uri(path);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = request
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json_body = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };

    (status, json_body)
}

#[tokio::test]
async fn push_then_read_roundtrip() {
    let (app, _) = setup_test_router();

    let body = json!({"title": "Song", "artist": "Band", "source": "X"}).to_string();
    let (status, response) = make_request(&app, "POST", "/nowplaying", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.unwrap(), json!({"status": "ok"}));

    let (status, response) = make_request(&app, "GET", "/nowplaying", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response.unwrap(),
        json!({"title": "Song", "artist": "Band", "source": "X"})
    );
}

#[tokio::test]
async fn clear_resets_the_state() {
    let (app, store) = setup_test_router();
    store.update("Song", "Band", "X").await;

    let (status, response) = make_request(&app, "POST", "/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.unwrap(), json!({"status": "cleared"}));

    let (status, response) = make_request(&app, "GET", "/nowplaying", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response.unwrap(),
        json!({"title": "", "artist": "", "source": ""})
    );
}

#[tokio::test]
async fn missing_keys_default_to_empty() {
    let (app, store) = setup_test_router();
    store.update("Stale", "Value", "X").await;

    let body = json!({"title": "Only a title"}).to_string();
    let (status, _) = make_request(&app, "POST", "/nowplaying", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let snap = store.snapshot().await;
    assert_eq!(snap.title, "Only a title");
    assert_eq!(snap.artist, "");
    assert_eq!(snap.source, "");
}

#[tokio::test]
async fn unrecognized_keys_are_ignored() {
    let (app, store) = setup_test_router();

    let body = json!({
        "title": "Song",
        "artist": "Band",
        "album": "ignored",
        "position": "ignored too"
    })
    .to_string();
    let (status, _) = make_request(&app, "POST", "/nowplaying", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let snap = store.snapshot().await;
    assert_eq!(snap.title, "Song");
    assert_eq!(snap.artist, "Band");
}

#[tokio::test]
async fn pushed_fields_are_trimmed() {
    let (app, store) = setup_test_router();

    let body = json!({"title": "  Song ", "artist": " Band  ", "source": " X "}).to_string();
    let (status, _) = make_request(&app, "POST", "/nowplaying", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let snap = store.snapshot().await;
    assert_eq!(snap.title, "Song");
    assert_eq!(snap.artist, "Band");
    assert_eq!(snap.source, "X");
}

#[tokio::test]
async fn malformed_body_yields_500_and_keeps_state() {
    let (app, store) = setup_test_router();
    store.update("Stale", "Value", "X").await;

    let (status, response) =
        make_request(&app, "POST", "/nowplaying", Some("not json".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.unwrap()["error"].is_string());

    let snap = store.snapshot().await;
    assert_eq!(snap.title, "Stale");
    assert_eq!(snap.artist, "Value");
}

#[tokio::test]
async fn wrong_methods_yield_405_body() {
    let (app, _) = setup_test_router();

    for (method, path) in [
        ("DELETE", "/nowplaying"),
        ("PUT", "/nowplaying"),
        ("GET", "/clear"),
        ("DELETE", "/clear"),
    ] {
        let (status, response) = make_request(&app, method, path, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, path);
        assert_eq!(
            response.unwrap(),
            json!({"error": "method_not_allowed"}),
            "{} {}",
            method,
            path
        );
    }
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (app, _) = setup_test_router();
    let (status, _) = make_request(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn start_if_not_running_is_idempotent() {
    let store = Arc::new(NowPlayingStore::new());
    let server = LocalServer::new(Arc::clone(&store));

    // Port 0 lets the OS assign a free port
    server.start_if_not_running(0).await.unwrap();
    let addr = server.local_addr().await.unwrap();

    // Second start: no error, no rebind
    server.start_if_not_running(0).await.unwrap();
    assert_eq!(server.local_addr().await.unwrap(), addr);

    // The socket bound by the first call actually serves
    store.update("Song", "Band", "X").await;
    let response: Value = reqwest::get(format!("http://{}/nowplaying", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        response,
        json!({"title": "Song", "artist": "Band", "source": "X"})
    );
}
