//! Integration tests for the `/events` SSE stream and its connection
//! registry.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use futures::StreamExt;
use serde_json::json;
use tower::ServiceExt;

/// Read the next SSE frame from a streaming body, with a timeout so a
/// stalled stream fails the test instead of hanging it.
async fn next_frame(body: &mut axum::body::BodyDataStream) -> String {
    let chunk = tokio::time::timeout(std::time::Duration::from_secs(5), body.next())
        .await
        .expect("timed out waiting for SSE frame")
        .expect("stream ended unexpectedly")
        .expect("stream errored");
    String::from_utf8(chunk.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Test: the stream opens with a connected event carrying the user
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stream_opens_with_connected_event() {
    let (app, state) = common::build_test_app_with_state();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let frame = next_frame(&mut body).await;
    assert!(frame.contains("\"type\":\"connected\""));
    assert!(frame.contains("\"user\""));

    // The connection is registered while the stream lives...
    assert_eq!(state.connections.count(), 1);

    // ...and deregistered as soon as the client goes away.
    drop(body);
    assert_eq!(state.connections.count(), 0);
}

// ---------------------------------------------------------------------------
// Test: relay events reach the subscriber as kv:set payloads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn relay_events_are_forwarded() {
    let (app, state) = common::build_test_app_with_state();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let mut body = response.into_body().into_data_stream();

    // Skip the connected event.
    let _ = next_frame(&mut body).await;

    let key = corkboard_kv::KvKey::from(["settings", "banner"]);
    state.relay.set(&key, json!({ "text": "hi" })).await.unwrap();

    let frame = next_frame(&mut body).await;
    assert!(frame.contains("\"type\":\"kv:set\""));
    assert!(frame.contains("banner"));

    state.relay.delete(&key).await.unwrap();
    let frame = next_frame(&mut body).await;
    assert!(frame.contains("\"type\":\"kv:delete\""));
}

// ---------------------------------------------------------------------------
// Test: card mutations through the HTTP API show up on the stream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn card_creation_is_broadcast() {
    let (app, _state) = common::build_test_app_with_state();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let mut body = response.into_body().into_data_stream();
    let _ = next_frame(&mut body).await;

    let response = common::post_json(&app, "/cards/info/create", json!({ "name": "live" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Creation writes meta then data; both are announced.
    let frame = next_frame(&mut body).await;
    assert!(frame.contains("kv:set"));
    assert!(frame.contains("meta"));

    let frame = next_frame(&mut body).await;
    assert!(frame.contains("kv:set"));
    assert!(frame.contains("data"));
}

// ---------------------------------------------------------------------------
// Test: every stream gets its own registry entry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_streams_each_register() {
    let (app, state) = common::build_test_app_with_state();

    let mut bodies = Vec::new();
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let mut body = response.into_body().into_data_stream();
        let _ = next_frame(&mut body).await;
        bodies.push(body);
    }

    assert_eq!(state.connections.count(), 3);

    bodies.pop();
    assert_eq!(state.connections.count(), 2);

    bodies.clear();
    assert_eq!(state.connections.count(), 0);
}
