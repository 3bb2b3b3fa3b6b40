//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct
//! HTTP status code and `{"error": ...}` body. They do NOT need an HTTP
//! server -- they call `IntoResponse` directly on `AppError` values.

use axum::response::IntoResponse;
use http_body_util::BodyExt;

use corkboard_api::error::AppError;
use corkboard_core::error::CoreError;
use corkboard_kv::KvError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 "not found"
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, json) = error_to_response(AppError::Core(CoreError::NotFound)).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with the raw message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Name is required".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Name is required");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Forbidden maps to 403 "forbidden"
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forbidden_error_returns_403() {
    let (status, json) = error_to_response(AppError::Core(CoreError::Forbidden)).await;

    assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with its message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("invalid field value".into())).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Test: store errors map to 500 and sanitize the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn kv_error_returns_500_and_sanitizes_message() {
    let err = AppError::Kv(KvError::Store("backend credentials leaked".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal server error");

    // The response body must NOT contain the original error details.
    assert!(
        !json.to_string().contains("credentials"),
        "internal error response must not leak backend details"
    );
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::Internal("secret connection string".into());
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal server error");
    assert!(!json.to_string().contains("secret"));
}
