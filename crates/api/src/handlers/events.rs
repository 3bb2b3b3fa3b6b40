//! The `/events` SSE stream.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Extension;
use futures::stream::{self, Stream, StreamExt};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use corkboard_core::types::new_id;

use crate::middleware::session::CurrentUser;
use crate::state::AppState;

/// GET /events
///
/// One-way live update stream. The first event is
/// `{"type":"connected","user":...}`; every subsequent event is a relay
/// payload (`kv:set` / `kv:delete`) serialized as JSON. The connection
/// registry guard lives inside the stream state, so the connection is
/// deregistered whenever the stream is dropped -- explicit close, error,
/// or client abort alike.
pub async fn events_stream(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let conn_id = new_id();
    let guard = state.connections.register(&conn_id, &user.id);
    let rx = state.relay.subscribe();

    tracing::info!(conn_id = %conn_id, user_id = %user.id, "SSE client connected");

    let connected = Event::default().data(json!({ "type": "connected", "user": user }).to_string());

    let updates = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(data) => {
                        return Some((Ok(Event::default().data(data)), (rx, guard)));
                    }
                    Err(error) => {
                        tracing::error!(%error, "failed to serialize relay event");
                        continue;
                    }
                },
                // Missed events are gone; clients re-fetch, they are not
                // replayed.
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let stream = stream::once(async move { Ok(connected) }).chain(updates);

    Sse::new(stream).keep_alive(KeepAlive::default())
}
