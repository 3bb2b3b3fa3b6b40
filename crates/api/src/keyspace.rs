//! The KV key namespace and raw-key validation.
//!
//! All persisted state lives under four top-level categories:
//!
//! ```text
//! ["cards", <type>, "meta", <cardId>]    card metadata record
//! ["cards", <type>, "data", <cardId>]    card message container
//! ["cards", <type>, "list", <userId>]    legacy per-user listing (read-only)
//! ["users", <userId>]                    user record
//! ["sessions", <sessionId>]              session record
//! ```

use corkboard_core::error::CoreError;
use corkboard_kv::{KeyPart, KvKey};

pub fn card_meta(card_type: &str, card_id: &str) -> KvKey {
    KvKey::from(["cards", card_type, "meta", card_id])
}

pub fn card_data(card_type: &str, card_id: &str) -> KvKey {
    KvKey::from(["cards", card_type, "data", card_id])
}

/// Prefix covering every metadata record of one card type.
pub fn card_meta_prefix(card_type: &str) -> KvKey {
    KvKey::from(["cards", card_type, "meta"])
}

/// Per-user listing key kept from an earlier schema generation. Nothing
/// writes it anymore; old stores may still contain entries.
pub fn card_list(card_type: &str, user_id: &str) -> KvKey {
    KvKey::from(["cards", card_type, "list", user_id])
}

pub fn user(user_id: &str) -> KvKey {
    KvKey::from(["users", user_id])
}

pub fn session(session_id: &str) -> KvKey {
    KvKey::from(["sessions", session_id])
}

pub fn sessions_prefix() -> KvKey {
    KvKey::from(["sessions"])
}

/// Charset filter for raw key strings from the `/kv` endpoints:
/// alphanumeric, `,` and `-` only, and no `..` anywhere. `/` and `\`
/// fail the whitelist outright.
pub fn is_valid_raw_key(raw: &str) -> bool {
    !raw.is_empty()
        && !raw.contains("..")
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ',' || c == '-')
}

/// A single path/query identifier (card type, card id): the raw-key
/// charset minus the tuple separator.
pub fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty()
        && !value.contains("..")
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Parse a comma-separated raw key (`a,b,c`) into a [`KvKey`].
///
/// Rejects anything failing the charset filter, including empty
/// segments, with a validation error that surfaces as HTTP 400.
pub fn parse_raw_key(raw: &str) -> Result<KvKey, CoreError> {
    if !is_valid_raw_key(raw) {
        return Err(CoreError::Validation("invalid key".into()));
    }
    let parts: Vec<KeyPart> = raw.split(',').map(KeyPart::from).collect();
    if parts.iter().any(|part| matches!(part, KeyPart::Str(s) if s.is_empty())) {
        return Err(CoreError::Validation("invalid key".into()));
    }
    Ok(KvKey(parts))
}
