//! Chat and message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ChatId, MessageId};

/// Title given to chats created without a first message.
pub const DEFAULT_CHAT_TITLE: &str = "New conversation";

/// Maximum number of characters taken from a message to form a title.
pub const TITLE_MAX_CHARS: usize = 60;

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// User message (input/prompt).
    User,
    /// Assistant message (response).
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One content part of a message, serialized as `{"type": ..., "text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        MessagePart::Text { text: text.into() }
    }
}

/// A message in a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier.
    pub id: MessageId,
    /// Role of this message.
    pub role: ChatRole,
    /// Ordered content parts.
    pub parts: Vec<MessagePart>,
}

impl ChatMessage {
    /// Create a single-part text message with a freshly generated id.
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role,
            parts: vec![MessagePart::text(text)],
        }
    }

    /// Builder method to set a specific ID (seed data, tests).
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = id;
        self
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                MessagePart::Text { text } => text.as_str(),
            })
            .collect()
    }
}

/// A chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Unique chat identifier.
    pub id: ChatId,

    /// Display title.
    pub title: String,

    /// Messages in append order.
    pub messages: Vec<ChatMessage>,

    /// When the chat was created.
    pub created_at: DateTime<Utc>,

    /// When the chat last changed; refreshed on every appended message.
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Create an empty chat stamped with `now`.
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: ChatId::generate(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set a specific ID (seed data, tests).
    pub fn with_id(mut self, id: ChatId) -> Self {
        self.id = id;
        self
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn summary(&self) -> ChatSummary {
        ChatSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            updated_at: self.updated_at,
            message_count: self.messages.len(),
        }
    }
}

/// Lightweight view of a chat for list displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: ChatId,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
}

/// First [`TITLE_MAX_CHARS`] characters of `text`.
pub fn title_prefix(text: &str) -> String {
    text.chars().take(TITLE_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefix_counts_chars_not_bytes() {
        let text = "é".repeat(80);
        let title = title_prefix(&text);
        assert_eq!(title.chars().count(), 60);
        assert_eq!(title_prefix("short"), "short");
    }

    #[test]
    fn test_message_part_wire_shape() {
        let json = serde_json::to_value(MessagePart::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "text", "text": "hi" }));
    }

    #[test]
    fn test_new_chat_timestamps_equal() {
        let now = Utc::now();
        let chat = Chat::new("Title", now);
        assert_eq!(chat.created_at, chat.updated_at);
        assert!(chat.messages.is_empty());
        assert_eq!(chat.summary().message_count, 0);
    }

    #[test]
    fn test_message_text() {
        let message = ChatMessage::new(ChatRole::Assistant, "hello");
        assert_eq!(message.text(), "hello");
        assert_eq!(message.role.as_str(), "assistant");
    }
}
