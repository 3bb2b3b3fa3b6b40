//! Shared helpers for integration tests.
//!
//! [`build_test_app`] mirrors the router construction in `main.rs` so
//! integration tests exercise the same middleware stack (CORS, request
//! ID, timeout, tracing, panic recovery, session resolution) that
//! production uses -- backed by a fresh in-memory store per test.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use corkboard_api::cards::CardRegistry;
use corkboard_api::config::ServerConfig;
use corkboard_api::router::build_app_router;
use corkboard_api::session::SessionService;
use corkboard_api::sse::ConnectionRegistry;
use corkboard_api::state::AppState;
use corkboard_events::KvRelay;
use corkboard_kv::{KvStore, MemoryKv};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 30,
        session_sweep_interval_secs: 3600,
        relay_capacity: 64,
    }
}

/// Build the application state over a fresh in-memory store.
pub fn test_state() -> AppState {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
    let relay = Arc::new(KvRelay::with_default_capacity(store));
    AppState {
        relay: Arc::clone(&relay),
        config: Arc::new(test_config()),
        connections: Arc::new(ConnectionRegistry::new()),
        cards: Arc::new(CardRegistry::builtin()),
        sessions: SessionService::new(relay),
    }
}

/// Build the full application router over fresh state.
pub fn build_test_app() -> Router {
    let state = test_state();
    let config = test_config();
    build_app_router(state, &config)
}

/// Build the router and keep the state for direct inspection.
pub fn build_test_app_with_state() -> (Router, AppState) {
    let state = test_state();
    let config = test_config();
    (build_app_router(state.clone(), &config), state)
}

/// Issue a request with optional cookie and JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Extract the `userId=...` pair from a response's Set-Cookie header.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find(|pair| pair.starts_with("userId="))
        .map(ToOwned::to_owned)
}

/// First request against a fresh app: returns the session cookie pair.
pub async fn establish_session(app: &Router) -> String {
    let response = get(app, "/me").await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response).expect("first contact must set a session cookie")
}
