//! Route definition for the SSE stream.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// `/events` -- long-lived SSE response.
pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(events::events_stream))
}
