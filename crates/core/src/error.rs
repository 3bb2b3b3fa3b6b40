/// Domain-level error taxonomy.
///
/// The Display strings double as client-facing messages: the API layer
/// serializes them verbatim into `{"error": ...}` bodies, so `NotFound`
/// and `Forbidden` stay terse while `Validation` carries the field-level
/// message produced at the call site.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}
