//! In-process store backed by an ordered map.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::atomic::{AtomicOp, CommitResult, Mutation};
use crate::error::KvError;
use crate::key::KvKey;
use crate::store::{KvEntry, KvStore};

#[derive(Debug, Clone)]
struct Versioned {
    value: Value,
    version: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<KvKey, Versioned>,
    next_version: u64,
}

impl Inner {
    fn bump(&mut self) -> u64 {
        self.next_version += 1;
        self.next_version
    }
}

/// `BTreeMap`-backed [`KvStore`].
///
/// The map's key order is the structural tuple order, so prefix listing
/// is a bounded range scan. All mutations run under one write lock,
/// which is what makes [`atomic`](KvStore::atomic) all-or-nothing.
#[derive(Debug, Default)]
pub struct MemoryKv {
    inner: RwLock<Inner>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &KvKey) -> Result<Option<KvEntry>, KvError> {
        let inner = self.inner.read().await;
        Ok(inner.entries.get(key).map(|stored| KvEntry {
            key: key.clone(),
            value: stored.value.clone(),
            version: stored.version,
        }))
    }

    async fn set(&self, key: &KvKey, value: Value) -> Result<u64, KvError> {
        let mut inner = self.inner.write().await;
        let version = inner.bump();
        inner.entries.insert(key.clone(), Versioned { value, version });
        Ok(version)
    }

    async fn delete(&self, key: &KvKey) -> Result<(), KvError> {
        let mut inner = self.inner.write().await;
        inner.entries.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &KvKey, limit: Option<usize>) -> Result<Vec<KvEntry>, KvError> {
        let inner = self.inner.read().await;
        // Keys extending the prefix sit in one contiguous range directly
        // after the prefix itself, which is excluded from results.
        let range = inner
            .entries
            .range::<KvKey, _>((Bound::Excluded(prefix), Bound::Unbounded));

        let mut out = Vec::new();
        for (key, stored) in range {
            if !key.starts_with(prefix) {
                break;
            }
            out.push(KvEntry {
                key: key.clone(),
                value: stored.value.clone(),
                version: stored.version,
            });
            if limit.is_some_and(|cap| out.len() >= cap) {
                break;
            }
        }
        Ok(out)
    }

    async fn atomic(&self, op: AtomicOp) -> Result<CommitResult, KvError> {
        let mut inner = self.inner.write().await;

        for check in &op.checks {
            let current = inner.entries.get(&check.key).map(|stored| stored.version);
            if current != check.version {
                tracing::debug!(key = %check.key, "atomic commit conflict");
                return Ok(CommitResult::Conflict);
            }
        }

        // One commit version stamps every write in the batch.
        let version = inner.bump();
        for mutation in op.mutations {
            match mutation {
                Mutation::Set { key, value } => {
                    inner.entries.insert(key, Versioned { value, version });
                }
                Mutation::Delete { key } => {
                    inner.entries.remove(&key);
                }
            }
        }
        Ok(CommitResult::Committed { version })
    }
}
