//! User identity and session models.

use std::collections::HashMap;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::types::{new_id, Id, Timestamp};

/// Session lifetime: 7 days from creation, no proactive renewal.
pub const SESSION_TTL_SECS: i64 = 604_800;

/// Display colors assigned round-robin-randomly to new anonymous users.
const COLORS: &[&str] = &[
    "#e63946", "#f4a261", "#e9c46a", "#2a9d8f", "#264653", "#6d597a", "#457b9d", "#80b918",
];

/// Sprite names for the default avatar set.
const SPRITES: &[&str] = &[
    "ghost", "robot", "cat", "fox", "owl", "frog", "squid", "bee",
];

/// Whether an account belongs to a person or an automated agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Human,
    Ai,
}

/// Per-user settings. `extra` keeps unknown keys round-trippable so
/// clients can stash their own flags without a schema change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: String,
    pub language: String,
    pub notifications: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "dark".into(),
            language: "en".into(),
            notifications: false,
            extra: HashMap::new(),
        }
    }
}

/// Permission flags plus the card types this user may create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_create_cards: bool,
    pub can_delete_cards: bool,
    pub allowed_card_types: Vec<String>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            can_create_cards: true,
            can_delete_cards: true,
            allowed_card_types: vec!["info".into(), "test".into(), "message".into()],
        }
    }
}

/// A user record, created on first contact and keyed at `["users", id]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub color: String,
    pub sprite: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Id>,
    pub created: Timestamp,
    pub last_seen: Timestamp,
    pub preferences: Preferences,
    pub capabilities: Capabilities,
}

impl User {
    /// Synthesize a fresh anonymous user with randomized display attributes.
    ///
    /// The caller is responsible for attaching a session and persisting.
    pub fn anonymous() -> Self {
        let mut rng = rand::rng();
        let id = new_id();
        let short = &id[..8];
        let now = chrono::Utc::now();

        Self {
            username: format!("user-{short}"),
            email: String::new(),
            user_type: UserType::Human,
            color: COLORS.choose(&mut rng).expect("palette is non-empty").to_string(),
            sprite: SPRITES.choose(&mut rng).expect("sprite set is non-empty").to_string(),
            session_id: None,
            created: now,
            last_seen: now,
            preferences: Preferences::default(),
            capabilities: Capabilities::default(),
            id,
        }
    }
}

/// An anonymous session record, keyed at `["sessions", id]`.
///
/// `cookie` holds the serialized Set-Cookie value handed to the browser,
/// so re-issuing the same session re-issues the exact same header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: Id,
    pub user_id: Id,
    pub created: Timestamp,
    pub expires: Timestamp,
    pub cookie: String,
}

impl Session {
    /// Create a session for `user_id` with the fixed 7-day TTL.
    pub fn new(user_id: &str) -> Self {
        let now = chrono::Utc::now();
        Self {
            session_id: new_id(),
            user_id: user_id.to_string(),
            created: now,
            expires: now + chrono::Duration::seconds(SESSION_TTL_SECS),
            cookie: format!(
                "userId={user_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECS}"
            ),
        }
    }

    /// True once the expiry instant has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires <= now
    }
}
