/// All entity ids are opaque UUID v4 strings.
pub type Id = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh random entity id.
pub fn new_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
