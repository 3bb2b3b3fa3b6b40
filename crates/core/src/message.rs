//! Messages attached to a card's data record.

use serde::{Deserialize, Serialize};

use crate::card::CardAuthor;
use crate::types::{new_id, Id, Timestamp};

/// Message kind. Plain chat text unless a producer marks it otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Command,
    Event,
    System,
}

/// Optional per-message extras: command envelope and edit tracking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<Timestamp>,
}

/// A single message embedded in a card's data record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMessage {
    pub id: Id,
    pub card_id: Id,
    pub content: String,
    pub timestamp: Timestamp,
    pub author: CardAuthor,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl CardMessage {
    /// Build a plain text message stamped with the current time.
    pub fn text(card_id: &str, content: &str, author: CardAuthor) -> Self {
        Self {
            id: new_id(),
            card_id: card_id.to_string(),
            content: content.to_string(),
            timestamp: chrono::Utc::now(),
            author,
            message_type: MessageType::Text,
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::User;

    #[test]
    fn text_message_defaults() {
        let user = User::anonymous();
        let msg = CardMessage::text("card-1", "hello", CardAuthor::from(&user));

        assert_eq!(msg.card_id, "card-1");
        assert_eq!(msg.content, "hello");
        assert_eq!(msg.message_type, MessageType::Text);
        assert!(msg.metadata.is_none());
    }

    #[test]
    fn message_type_serializes_lowercase() {
        let value = serde_json::to_value(MessageType::System).unwrap();
        assert_eq!(value, "system");
    }

    #[test]
    fn metadata_omits_empty_fields() {
        let user = User::anonymous();
        let msg = CardMessage::text("c", "m", CardAuthor::from(&user));
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("metadata").is_none());
        assert_eq!(value["type"], "text");
        assert_eq!(value["cardId"], "c");
    }
}
