//! Domain types shared across the corkboard workspace.
//!
//! This crate is I/O-free: cards, messages, users, and sessions are plain
//! data with serde derives matching the JSON wire format. Persistence lives
//! in `corkboard-kv`, transport in `corkboard-api`.

pub mod card;
pub mod error;
pub mod message;
pub mod types;
pub mod user;
