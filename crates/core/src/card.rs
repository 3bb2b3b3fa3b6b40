//! Card models: the metadata record served by listings and the data
//! record holding the message list.

use serde::{Deserialize, Serialize};

use crate::message::CardMessage;
use crate::types::{new_id, Id, Timestamp};
use crate::user::{User, UserType};

/// Denormalized author snapshot embedded in cards and messages.
///
/// A snapshot, not a reference: later changes to the user record do not
/// rewrite existing cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAuthor {
    pub id: Id,
    pub username: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub color: String,
    pub sprite: String,
}

impl From<&User> for CardAuthor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            user_type: user.user_type,
            color: user.color.clone(),
            sprite: user.sprite.clone(),
        }
    }
}

/// Permission lists keyed by user id, with `"*"` as the wildcard entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPermissions {
    pub can_view: Vec<String>,
    pub can_edit: Vec<String>,
    pub can_delete: Vec<String>,
}

impl CardPermissions {
    /// Owner-writable, world-readable defaults for a new card.
    pub fn for_owner(owner_id: &str) -> Self {
        Self {
            can_view: vec!["*".into()],
            can_edit: vec![owner_id.to_string()],
            can_delete: vec![owner_id.to_string()],
        }
    }

    /// True when `user_id` appears in `list` directly or via wildcard.
    pub fn grants(list: &[String], user_id: &str) -> bool {
        list.iter().any(|entry| entry == "*" || entry == user_id)
    }
}

/// Card envelope metadata: schema version plus permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMetadata {
    pub schema_version: u32,
    pub permissions: CardPermissions,
}

/// The card metadata record, stored at `["cards", type, "meta", id]`.
///
/// Identity and type are immutable after creation; `name`, `content`, and
/// `last_updated` mutate over the card's life.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseCard {
    pub id: Id,
    #[serde(rename = "type")]
    pub card_type: String,
    pub name: String,
    pub created: Timestamp,
    pub last_updated: Timestamp,
    pub created_by: CardAuthor,
    /// Type-specific payload, opaque to the router.
    pub content: serde_json::Value,
    pub metadata: CardMetadata,
}

impl BaseCard {
    /// Construct a new card of `card_type` owned by `author`.
    pub fn new(
        card_type: &str,
        name: &str,
        author: CardAuthor,
        content: serde_json::Value,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: new_id(),
            card_type: card_type.to_string(),
            name: name.to_string(),
            created: now,
            last_updated: now,
            metadata: CardMetadata {
                schema_version: 1,
                permissions: CardPermissions::for_owner(&author.id),
            },
            created_by: author,
            content,
        }
    }
}

/// The card data record, stored at `["cards", type, "data", id]`.
///
/// Messages have no storage location of their own; they live embedded in
/// this record and every mutation rewrites it whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub card_id: Id,
    pub messages: Vec<CardMessage>,
}

impl CardData {
    /// Empty message container for a freshly created card.
    pub fn empty(card_id: &str) -> Self {
        Self {
            card_id: card_id.to_string(),
            messages: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::User;

    #[test]
    fn new_card_snapshots_author_and_owner_permissions() {
        let user = User::anonymous();
        let card = BaseCard::new("info", "Test Card", CardAuthor::from(&user), serde_json::json!({}));

        assert_eq!(card.card_type, "info");
        assert_eq!(card.name, "Test Card");
        assert_eq!(card.created_by.id, user.id);
        assert_eq!(card.metadata.schema_version, 1);
        assert_eq!(card.metadata.permissions.can_view, vec!["*".to_string()]);
        assert_eq!(card.metadata.permissions.can_delete, vec![user.id.clone()]);
    }

    #[test]
    fn wildcard_grants_any_user() {
        let perms = CardPermissions::for_owner("owner");
        assert!(CardPermissions::grants(&perms.can_view, "someone-else"));
        assert!(CardPermissions::grants(&perms.can_delete, "owner"));
        assert!(!CardPermissions::grants(&perms.can_delete, "someone-else"));
    }

    #[test]
    fn card_serializes_camel_case() {
        let user = User::anonymous();
        let card = BaseCard::new("info", "n", CardAuthor::from(&user), serde_json::json!({}));
        let value = serde_json::to_value(&card).unwrap();

        assert!(value.get("lastUpdated").is_some());
        assert!(value.get("createdBy").is_some());
        assert_eq!(value["type"], "info");
        assert_eq!(value["createdBy"]["type"], "human");
    }
}
