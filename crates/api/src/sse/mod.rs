//! SSE connection registry.
//!
//! Every live `/events` stream is tracked under a connection id. A
//! stream owns a [`ConnectionGuard`] whose `Drop` deregisters it, so
//! cleanup happens on every exit path -- explicit close, error, or
//! client abort -- without the handler having to remember.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use corkboard_core::types::Timestamp;

/// Metadata for a single live SSE connection.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub user_id: String,
    pub connected_at: Timestamp,
}

/// Registry of live SSE connections keyed by connection id.
///
/// Uses a synchronous mutex so [`ConnectionGuard::drop`] can deregister
/// without an async context; the critical sections are map lookups only.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<String, ConnectionInfo>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection; the returned guard deregisters it on drop.
    pub fn register(self: &Arc<Self>, conn_id: &str, user_id: &str) -> ConnectionGuard {
        let info = ConnectionInfo {
            user_id: user_id.to_string(),
            connected_at: chrono::Utc::now(),
        };
        self.lock().insert(conn_id.to_string(), info);
        ConnectionGuard {
            registry: Arc::clone(self),
            conn_id: conn_id.to_string(),
        }
    }

    /// Current number of live connections.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Connection ids currently registered for `user_id`.
    pub fn ids_for_user(&self, user_id: &str) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(_, info)| info.user_id == user_id)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn remove(&self, conn_id: &str) {
        self.lock().remove(conn_id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, ConnectionInfo>> {
        self.connections
            .lock()
            .expect("connection registry lock poisoned")
    }
}

/// RAII handle for a registered connection.
pub struct ConnectionGuard {
    registry: Arc<ConnectionRegistry>,
    conn_id: String,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.conn_id);
        tracing::info!(conn_id = %self.conn_id, "SSE client disconnected");
    }
}
