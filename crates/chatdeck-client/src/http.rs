//! HTTP client for the REST endpoints.

use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use chatdeck_core::api::{
    ActiveChat, AddMessageRequest, ChatGroupView, CreateChatRequest, ModelsResponse,
    PromptRequest, PromptResponse, RenameChatRequest,
};
use chatdeck_core::{Chat, ChatId, ChatMessage, ChatRole};

use crate::error::ClientError;

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the chatdeck API.
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the server is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let url = self.url(&["health"])?;
        debug!(url = %url, "Checking health");

        let response = self.inner.get(url).send().await?;
        Ok(response.status().is_success())
    }

    pub async fn list_chats(&self) -> Result<Vec<Chat>, ClientError> {
        self.get_json(&["v1", "chats"]).await
    }

    pub async fn grouped_chats(&self) -> Result<Vec<ChatGroupView>, ClientError> {
        self.get_json(&["v1", "chats", "grouped"]).await
    }

    pub async fn get_chat(&self, chat_id: &ChatId) -> Result<Chat, ClientError> {
        self.get_json(&chat_path(chat_id, None)).await
    }

    /// Create a chat; the server makes it the active one.
    pub async fn create_chat(&self, first_message: Option<&str>) -> Result<Chat, ClientError> {
        let body = CreateChatRequest {
            first_message: first_message.map(str::to_string),
        };
        self.send_json(Method::POST, &["v1", "chats"], &body).await
    }

    pub async fn rename_chat(&self, chat_id: &ChatId, title: &str) -> Result<(), ClientError> {
        let body = RenameChatRequest {
            title: title.to_string(),
        };
        self.send(Method::PATCH, &chat_path(chat_id, None), Some(&body))
            .await
            .map(drop)
    }

    pub async fn delete_chat(&self, chat_id: &ChatId) -> Result<(), ClientError> {
        self.send::<()>(Method::DELETE, &chat_path(chat_id, None), None)
            .await
            .map(drop)
    }

    pub async fn add_message(
        &self,
        chat_id: &ChatId,
        role: ChatRole,
        text: &str,
    ) -> Result<ChatMessage, ClientError> {
        let body = AddMessageRequest {
            role,
            text: text.to_string(),
        };
        self.send_json(Method::POST, &chat_path(chat_id, Some("messages")), &body)
            .await
    }

    /// Send a user message and get the assistant reply back.
    pub async fn prompt(
        &self,
        chat_id: &ChatId,
        text: &str,
        model: Option<&str>,
    ) -> Result<PromptResponse, ClientError> {
        let body = PromptRequest {
            text: text.to_string(),
            model: model.map(str::to_string),
        };
        self.send_json(Method::POST, &chat_path(chat_id, Some("prompt")), &body)
            .await
    }

    pub async fn active_chat(&self) -> Result<Option<ChatId>, ClientError> {
        let active: ActiveChat = self.get_json(&["v1", "active"]).await?;
        Ok(active.chat_id)
    }

    /// Select a chat, or clear the selection with `None`.
    pub async fn select_chat(&self, chat_id: Option<&ChatId>) -> Result<Option<ChatId>, ClientError> {
        let body = ActiveChat {
            chat_id: chat_id.cloned(),
        };
        let active: ActiveChat = self.send_json(Method::PUT, &["v1", "active"], &body).await?;
        Ok(active.chat_id)
    }

    pub async fn models(&self) -> Result<ModelsResponse, ClientError> {
        self.get_json(&["v1", "models"]).await
    }

    /// Get JSON from the endpoint at `segments` below the base URL.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let response = self.send::<()>(Method::GET, segments, None).await?;
        decode(response).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.send(method, segments, Some(body)).await?;
        decode(response).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        debug!(method = %method, url = %url, "HTTP request");

        let mut request = self.inner.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(error_message(&text, &path)));
        }
        Err(ClientError::Status {
            status: status.as_u16(),
            message: error_message(&text, status.as_str()),
        })
    }

    /// Append percent-encoded `segments` to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn chat_path<'a>(chat_id: &'a ChatId, action: Option<&'a str>) -> Vec<&'a str> {
    let mut segments = vec!["v1", "chats", chat_id.as_str()];
    segments.extend(action);
    segments
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    response
        .json()
        .await
        .map_err(|e| ClientError::Serialization(e.to_string()))
}

/// The `error` field of a server error body, or `fallback` when absent.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let client = HttpClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.url(&["health"]).unwrap().as_str(),
            "http://localhost:3000/health"
        );
    }

    #[test]
    fn test_chat_urls() {
        let client = HttpClient::new("http://localhost:3000");
        let id = ChatId::new("chat-1");
        assert_eq!(
            client.url(&chat_path(&id, None)).unwrap().as_str(),
            "http://localhost:3000/v1/chats/chat-1"
        );
        assert_eq!(
            client.url(&chat_path(&id, Some("prompt"))).unwrap().as_str(),
            "http://localhost:3000/v1/chats/chat-1/prompt"
        );
    }

    #[test]
    fn test_chat_id_is_one_encoded_segment() {
        let client = HttpClient::new("http://localhost:3000/api/");
        let id = ChatId::new("a/b?c#d");
        let url = client.url(&chat_path(&id, Some("messages"))).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/v1/chats/a%2Fb%3Fc%23d/messages"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_base_url_must_be_absolute() {
        let client = HttpClient::new("localhost:3000");
        assert!(client.url(&["health"]).is_err());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"error":"Chat not found: x"}"#, "/v1/chats/x"),
            "Chat not found: x"
        );
        assert_eq!(error_message("<html>", "502"), "502");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let client = HttpClient::new("http://127.0.0.1:1");
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
