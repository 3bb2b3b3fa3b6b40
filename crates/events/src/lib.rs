//! In-process publish/subscribe relay for KV mutations.
//!
//! [`KvRelay`] pairs a [`KvStore`](corkboard_kv::KvStore) with a
//! `tokio::sync::broadcast` channel: writes go to the store first, then
//! fan out to every live subscriber. It is constructed once at startup
//! and shared via `Arc`.

pub mod relay;

pub use relay::{KeyWatch, KvEvent, KvRelay};
