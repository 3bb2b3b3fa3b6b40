//! Atomic check-then-mutate operations.

use serde_json::Value;

use crate::key::KvKey;

/// A version precondition on a single key.
///
/// `version: None` requires the key to be absent; `Some(v)` requires the
/// current entry version to equal `v` exactly.
#[derive(Debug, Clone)]
pub struct Check {
    pub key: KvKey,
    pub version: Option<u64>,
}

/// A write applied when all checks pass.
#[derive(Debug, Clone)]
pub enum Mutation {
    Set { key: KvKey, value: Value },
    Delete { key: KvKey },
}

/// A multi-key compare-and-set: checks are evaluated and mutations
/// applied under a single store write lock, all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct AtomicOp {
    pub checks: Vec<Check>,
    pub mutations: Vec<Mutation>,
}

impl AtomicOp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to be at `version` (`None` = absent) at commit time.
    pub fn check(mut self, key: impl Into<KvKey>, version: Option<u64>) -> Self {
        self.checks.push(Check {
            key: key.into(),
            version,
        });
        self
    }

    pub fn set(mut self, key: impl Into<KvKey>, value: Value) -> Self {
        self.mutations.push(Mutation::Set {
            key: key.into(),
            value,
        });
        self
    }

    pub fn delete(mut self, key: impl Into<KvKey>) -> Self {
        self.mutations.push(Mutation::Delete { key: key.into() });
        self
    }
}

/// Outcome of an atomic commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitResult {
    /// All checks passed; every `Set` mutation carries `version`.
    Committed { version: u64 },
    /// At least one check failed; nothing was written.
    Conflict,
}

impl CommitResult {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitResult::Committed { .. })
    }
}
