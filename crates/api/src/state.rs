use std::sync::Arc;

use corkboard_events::KvRelay;

use crate::cards::CardRegistry;
use crate::config::ServerConfig;
use crate::session::SessionService;
use crate::sse::ConnectionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Broadcast relay over the KV store; the only write path for card data.
    pub relay: Arc<KvRelay>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live SSE connections.
    pub connections: Arc<ConnectionRegistry>,
    /// Known card types and their hooks.
    pub cards: Arc<CardRegistry>,
    /// Cookie-to-user resolution and session lifecycle.
    pub sessions: SessionService,
}
