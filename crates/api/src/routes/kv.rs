//! Route definitions for the raw KV endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::kv;
use crate::state::AppState;

/// Routes mounted at `/kv`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kv/get", get(kv::get_value))
        .route("/kv/set", post(kv::set_value))
}
