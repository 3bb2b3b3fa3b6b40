//! Ordered-key key-value store: the single source of truth for all
//! persisted state.
//!
//! Keys are tuples of primitive parts with structural equality and
//! ordering, so "queries" are prefix scans over the key order. The
//! [`KvStore`] trait is the seam between domain code and the backend;
//! [`MemoryKv`] is the in-process implementation.

pub mod atomic;
pub mod error;
pub mod key;
pub mod memory;
pub mod store;

pub use atomic::{AtomicOp, Check, CommitResult, Mutation};
pub use error::KvError;
pub use key::{KeyPart, KvKey};
pub use memory::MemoryKv;
pub use store::{KvEntry, KvStore};
