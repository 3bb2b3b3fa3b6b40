/// Errors surfaced by store implementations and the typed accessors
/// layered on top of them.
///
/// Callers do not retry: a store failure propagates up and becomes an
/// HTTP 500 at the API boundary.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// A stored value did not decode into the expected shape, or an
    /// input value failed to encode.
    #[error("KV serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure.
    #[error("KV store error: {0}")]
    Store(String),
}
