//! Conversation message types.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
    /// System-generated message.
    System,
}

/// Local delivery status of a message. Never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryState {
    /// Confirmed by (or loaded from) the backend.
    #[default]
    Delivered,
    /// Shown optimistically, send still in flight.
    Pending,
    /// The send call failed; the message was never stored.
    Failed,
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(skip)]
    pub delivery: DeliveryState,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            delivery: DeliveryState::Delivered,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            delivery: DeliveryState::Delivered,
        }
    }

    pub fn with_delivery(mut self, delivery: DeliveryState) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn is_failed(&self) -> bool {
        self.delivery == DeliveryState::Failed
    }
}

/// Conversation summary as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    /// The backend stores a nullable title; `None` is read as an empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
}

/// A conversation together with its full message history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationDetail {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_ignores_extra_fields_and_defaults_messages() {
        let detail: ConversationDetail = serde_json::from_str(
            r#"{"id": 4, "title": null, "user_id": 1, "created_at": "2024-01-01T00:00:00"}"#,
        )
        .unwrap();

        assert_eq!(detail.id, 4);
        assert_eq!(detail.title, "");
        assert!(detail.messages.is_empty());
    }

    #[test]
    fn test_message_delivery_is_not_serialized() {
        let message = Message::user("hi").with_delivery(DeliveryState::Failed);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));

        let parsed: Message =
            serde_json::from_str(r#"{"role": "assistant", "content": "yo", "id": 9}"#).unwrap();
        assert_eq!(parsed, Message::assistant("yo"));
    }
}
