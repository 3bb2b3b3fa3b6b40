//! The store contract.

use async_trait::async_trait;
use serde_json::Value;

use crate::atomic::{AtomicOp, CommitResult};
use crate::error::KvError;
use crate::key::KvKey;

/// A stored entry: key, JSON value, and the commit version that wrote it.
///
/// Versions come from a per-store counter that increases with every
/// committed write, so they double as compare-and-set stamps.
#[derive(Debug, Clone)]
pub struct KvEntry {
    pub key: KvKey,
    pub value: Value,
    pub version: u64,
}

/// Uniform get/set/delete/list plus atomic compare-and-set over an
/// ordered-key store.
///
/// There is no TTL and no secondary indexing; all queries are prefix
/// scans in structural key order. `list` is finite and restartable --
/// re-issuing the same scan observes the then-current state.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch a single entry, or `None` when the key is absent.
    async fn get(&self, key: &KvKey) -> Result<Option<KvEntry>, KvError>;

    /// Write `value` at `key`, returning the new entry version.
    async fn set(&self, key: &KvKey, value: Value) -> Result<u64, KvError>;

    /// Remove `key`. Deleting an absent key is a no-op.
    async fn delete(&self, key: &KvKey) -> Result<(), KvError>;

    /// All entries whose key strictly extends `prefix`, in key order,
    /// capped at `limit` when given.
    async fn list(&self, prefix: &KvKey, limit: Option<usize>) -> Result<Vec<KvEntry>, KvError>;

    /// Evaluate checks and apply mutations atomically.
    async fn atomic(&self, op: AtomicOp) -> Result<CommitResult, KvError>;
}
