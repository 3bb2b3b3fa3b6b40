//! Broadcast relay over a KV store.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use corkboard_kv::{KvError, KvKey, KvStore};

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// A KV mutation event as delivered to subscribers (and, serialized,
/// to SSE clients).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum KvEvent {
    #[serde(rename = "kv:set")]
    Set { key: KvKey, value: Value },
    #[serde(rename = "kv:delete")]
    Delete { key: KvKey },
}

impl KvEvent {
    pub fn key(&self) -> &KvKey {
        match self {
            KvEvent::Set { key, .. } | KvEvent::Delete { key } => key,
        }
    }
}

/// Store wrapper that publishes every mutation to an in-process fan-out
/// channel.
///
/// Delivery is best-effort and at-most-once: only currently subscribed
/// listeners see an event, there is no replay, and no ordering is
/// guaranteed across different keys. The relay is process-local -- it
/// neither survives restarts nor spans server instances.
pub struct KvRelay {
    store: Arc<dyn KvStore>,
    sender: broadcast::Sender<KvEvent>,
}

impl KvRelay {
    /// Wrap `store` with a relay using the given channel capacity.
    ///
    /// When the buffer fills, the oldest un-consumed events are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(store: Arc<dyn KvStore>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { store, sender }
    }

    pub fn with_default_capacity(store: Arc<dyn KvStore>) -> Self {
        Self::new(store, DEFAULT_CAPACITY)
    }

    /// Direct access to the underlying store, for reads and for writes
    /// that should not be announced.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// Persist `value` at `key`, then announce the write.
    pub async fn set(&self, key: &KvKey, value: Value) -> Result<u64, KvError> {
        let version = self.store.set(key, value.clone()).await?;
        self.publish(KvEvent::Set {
            key: key.clone(),
            value,
        });
        Ok(version)
    }

    /// Persist a deletion at `key`, then announce it.
    pub async fn delete(&self, key: &KvKey) -> Result<(), KvError> {
        self.store.delete(key).await?;
        self.publish(KvEvent::Delete { key: key.clone() });
        Ok(())
    }

    /// Read and decode the value at `key`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &KvKey) -> Result<Option<T>, KvError> {
        match self.store.get(key).await? {
            Some(entry) => Ok(Some(serde_json::from_value(entry.value)?)),
            None => Ok(None),
        }
    }

    /// Encode `value` and persist-and-announce it at `key`.
    pub async fn set_json<T: Serialize>(&self, key: &KvKey, value: &T) -> Result<u64, KvError> {
        self.set(key, serde_json::to_value(value)?).await
    }

    /// Subscribe to every event published on this relay.
    pub fn subscribe(&self) -> broadcast::Receiver<KvEvent> {
        self.sender.subscribe()
    }

    /// Subscribe to changes of one exact key.
    pub fn watch(&self, key: KvKey) -> KeyWatch {
        KeyWatch {
            key,
            rx: self.sender.subscribe(),
        }
    }

    /// Read the current value at `key`, then subscribe to its changes.
    ///
    /// The read and the subscription are two separate steps: a write that
    /// lands between them is not observed until the following write. The
    /// caller gets the pre-subscription value so it can render immediately
    /// instead of waiting for the first change.
    pub async fn watch_immediate(
        &self,
        key: KvKey,
    ) -> Result<(Option<Value>, KeyWatch), KvError> {
        let current = self.store.get(&key).await?.map(|entry| entry.value);
        let watch = self.watch(key);
        Ok((current, watch))
    }

    /// Current number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, event: KvEvent) {
        // A send error only means there are zero receivers right now.
        let _ = self.sender.send(event);
    }
}

/// A subscription filtered to a single key.
pub struct KeyWatch {
    key: KvKey,
    rx: broadcast::Receiver<KvEvent>,
}

impl KeyWatch {
    /// Wait for the next change to the watched key.
    ///
    /// Yields `Some(Some(value))` on a set, `Some(None)` on a delete, and
    /// `None` once the relay is dropped. Lagged gaps are skipped -- missed
    /// events are not replayed.
    pub async fn next(&mut self) -> Option<Option<Value>> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.key() == &self.key => match event {
                    KvEvent::Set { value, .. } => return Some(Some(value)),
                    KvEvent::Delete { .. } => return Some(None),
                },
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(key = %self.key, skipped, "key watch lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
