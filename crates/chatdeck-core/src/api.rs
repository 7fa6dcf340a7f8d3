//! JSON request and response bodies shared by the server and the client.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatRole, ChatSummary};
use crate::grouping::ChatGroup;
use crate::ids::ChatId;
use crate::models::ModelOption;

// ============================================================================
// Chat types
// ============================================================================

/// Body for `POST /v1/chats`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub first_message: Option<String>,
}

/// Body for `PATCH /v1/chats/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameChatRequest {
    pub title: String,
}

/// Body for `POST /v1/chats/:id/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMessageRequest {
    pub role: ChatRole,
    pub text: String,
}

/// Body for `POST /v1/chats/:id/prompt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub text: String,
    /// Catalog model id; the default model when absent.
    #[serde(default)]
    pub model: Option<String>,
}

/// The user message and the reply appended for a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResponse {
    pub model: String,
    pub user: ChatMessage,
    pub assistant: ChatMessage,
}

/// One labelled group of the grouped chat list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatGroupView {
    pub label: String,
    pub chats: Vec<ChatSummary>,
}

impl From<&ChatGroup<'_>> for ChatGroupView {
    fn from(group: &ChatGroup<'_>) -> Self {
        Self {
            label: group.label().to_string(),
            chats: group.chats.iter().map(|chat| chat.summary()).collect(),
        }
    }
}

/// Body of `GET /v1/active` and `PUT /v1/active`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveChat {
    #[serde(default)]
    pub chat_id: Option<ChatId>,
}

// ============================================================================
// Model catalog types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelView {
    pub label: String,
    pub value: String,
    pub icon: String,
}

impl From<&ModelOption> for ModelView {
    fn from(model: &ModelOption) -> Self {
        Self {
            label: model.label.to_string(),
            value: model.value.to_string(),
            icon: model.icon.to_string(),
        }
    }
}

/// Body of `GET /v1/models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub default_model: String,
    pub models: Vec<ModelView>,
}
