//! Chat store handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, info};

use chatdeck_core::api::{
    ActiveChat, AddMessageRequest, ChatGroupView, CreateChatRequest, PromptRequest,
    PromptResponse, RenameChatRequest,
};
use chatdeck_core::{
    find_model, mock_response, Chat, ChatId, ChatMessage, ChatRole, CoreError, DEFAULT_MODEL,
};

use crate::http::responses::ApiError;
use crate::state::AppState;

fn not_found(chat_id: &ChatId) -> ApiError {
    ApiError::Core(CoreError::ChatNotFound(chat_id.to_string()))
}

/// List all chats, newest created first.
///
/// GET /v1/chats
pub async fn list_chats(State(state): State<Arc<AppState>>) -> Json<Vec<Chat>> {
    Json(state.store.read().await.chats().to_vec())
}

/// Chats grouped by recency.
///
/// GET /v1/chats/grouped
pub async fn grouped_chats(State(state): State<Arc<AppState>>) -> Json<Vec<ChatGroupView>> {
    let store = state.store.read().await;
    Json(store.grouped_chats().iter().map(ChatGroupView::from).collect())
}

/// Create a chat and make it active. The body is optional.
///
/// POST /v1/chats
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Chat>), ApiError> {
    let request = create_request(&headers, &body)?;
    let chat = state
        .store
        .write()
        .await
        .create_chat(request.first_message.as_deref());

    info!(chat_id = %chat.id, title = %chat.title, "Chat created");
    Ok((StatusCode::CREATED, Json(chat)))
}

/// An empty body means no first message. Anything else must be a JSON request.
fn create_request(headers: &HeaderMap, body: &[u8]) -> Result<CreateChatRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateChatRequest::default());
    }
    if !has_json_content_type(headers) {
        return Err(ApiError::BadRequest(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }
    Json::<CreateChatRequest>::from_bytes(body)
        .map(|Json(request)| request)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json"))
}

/// GET /v1/chats/:chat_id
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> Result<Json<Chat>, ApiError> {
    let chat_id = ChatId::new(chat_id);
    let store = state.store.read().await;
    store
        .chat(&chat_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(&chat_id))
}

/// PATCH /v1/chats/:chat_id
pub async fn rename_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
    Json(request): Json<RenameChatRequest>,
) -> Result<StatusCode, ApiError> {
    let chat_id = ChatId::new(chat_id);
    if !state.store.write().await.rename_chat(&chat_id, request.title) {
        return Err(not_found(&chat_id));
    }
    debug!(chat_id = %chat_id, "Chat renamed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/chats/:chat_id
pub async fn delete_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let chat_id = ChatId::new(chat_id);
    let removed = state.store.write().await.delete_chat(&chat_id);
    match removed {
        Some(chat) => {
            info!(chat_id = %chat.id, messages = chat.messages.len(), "Chat deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(not_found(&chat_id)),
    }
}

/// Append a message as-is.
///
/// POST /v1/chats/:chat_id/messages
pub async fn add_message(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
    Json(request): Json<AddMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), ApiError> {
    let chat_id = ChatId::new(chat_id);
    let mut store = state.store.write().await;
    let message = store
        .add_message(&chat_id, request.role, request.text)
        .cloned()
        .ok_or_else(|| not_found(&chat_id))?;

    debug!(chat_id = %chat_id, message_id = %message.id, role = message.role.as_str(), "Message added");
    Ok((StatusCode::CREATED, Json(message)))
}

/// Append a user message followed by the canned assistant reply.
///
/// POST /v1/chats/:chat_id/prompt
pub async fn prompt(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
    Json(request): Json<PromptRequest>,
) -> Result<(StatusCode, Json<PromptResponse>), ApiError> {
    let chat_id = ChatId::new(chat_id);
    let model = find_model(request.model.as_deref().unwrap_or(DEFAULT_MODEL))?;
    let reply = mock_response(&request.text);

    // Both messages land under one write lock so nothing interleaves.
    let mut store = state.store.write().await;
    let user = store
        .add_message(&chat_id, ChatRole::User, request.text)
        .cloned()
        .ok_or_else(|| not_found(&chat_id))?;
    let assistant = store
        .add_message(&chat_id, ChatRole::Assistant, reply)
        .cloned()
        .ok_or_else(|| not_found(&chat_id))?;
    drop(store);

    info!(chat_id = %chat_id, model = model.value, "Prompt answered");
    Ok((
        StatusCode::CREATED,
        Json(PromptResponse {
            model: model.value.to_string(),
            user,
            assistant,
        }),
    ))
}

/// GET /v1/active
pub async fn get_active_chat(State(state): State<Arc<AppState>>) -> Json<ActiveChat> {
    Json(ActiveChat {
        chat_id: state.store.read().await.active_chat_id().cloned(),
    })
}

/// Select a chat, or clear the selection with `{"chat_id": null}`.
///
/// PUT /v1/active
pub async fn set_active_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActiveChat>,
) -> Result<Json<ActiveChat>, ApiError> {
    let mut store = state.store.write().await;
    match &request.chat_id {
        Some(chat_id) => {
            if !store.select_chat(chat_id) {
                return Err(not_found(chat_id));
            }
        }
        None => store.clear_selection(),
    }
    Ok(Json(ActiveChat {
        chat_id: store.active_chat_id().cloned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::create_router;
    use crate::http::handlers::test_support::json_body;
    use crate::http::responses::ErrorResponse;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};
    use axum::response::{IntoResponse, Response};
    use tower::ServiceExt;
    use chatdeck_core::mock::MOCK_RESPONSES;

    fn seeded() -> Arc<AppState> {
        AppState::new(Config::default())
    }

    fn path(id: &str) -> Path<String> {
        Path(id.to_string())
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn create_empty(state: &Arc<AppState>) -> Chat {
        let (_, Json(chat)) = create_chat(State(state.clone()), HeaderMap::new(), Bytes::new())
            .await
            .unwrap();
        chat
    }

    async fn post_chat(state: &Arc<AppState>, content_type: Option<&str>, body: &str) -> Response {
        let mut request = Request::builder().method("POST").uri("/v1/chats");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        create_router(state.clone())
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let state = seeded();
        let request = CreateChatRequest {
            first_message: Some("Help me debug this".to_string()),
        };

        let body = Bytes::from(serde_json::to_vec(&request).unwrap());
        let (status, Json(chat)) = create_chat(State(state.clone()), json_headers(), body)
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_chat(State(state.clone()), path(chat.id.as_str()))
            .await
            .unwrap();
        assert_eq!(fetched.title, "Help me debug this");
        assert!(fetched.messages.is_empty());
        assert_eq!(fetched.created_at, fetched.updated_at);

        let Json(active) = get_active_chat(State(state)).await;
        assert_eq!(active.chat_id, Some(chat.id));
    }

    #[tokio::test]
    async fn test_create_without_body() {
        let state = seeded();
        let chat = create_empty(&state).await;
        assert_eq!(chat.title, "New conversation");

        let Json(chats) = list_chats(State(state)).await;
        assert_eq!(chats.len(), 9);
        assert_eq!(chats[0].id, chat.id);
    }

    #[tokio::test]
    async fn test_create_over_http_with_optional_body() {
        let state = seeded();

        let response = post_chat(&state, None, "").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let chat: Chat = json_body(response).await;
        assert_eq!(chat.title, "New conversation");

        let response = post_chat(&state, Some("application/json"), r#"{"first_message":"Hi there"}"#).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let chat: Chat = json_body(response).await;
        assert_eq!(chat.title, "Hi there");

        assert_eq!(state.store.read().await.len(), 10);
    }

    #[tokio::test]
    async fn test_malformed_create_body_is_rejected() {
        let state = seeded();
        let cases = [
            (Some("application/json"), r#"{"first_message": 42"#),
            (Some("application/json"), r#"{"first_message": 42}"#),
            (Some("text/plain"), r#"{"first_message":"Hi"}"#),
            (None, r#"{"first_message":"Hi"}"#),
        ];

        for (content_type, body) in cases {
            let response = post_chat(&state, content_type, body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let error: ErrorResponse = json_body(response).await;
            assert!(!error.error.is_empty());
        }

        let store = state.store.read().await;
        assert_eq!(store.len(), 8);
        assert!(store.active_chat_id().is_none());
    }

    #[tokio::test]
    async fn test_unknown_chat_is_404() {
        let state = seeded();

        let err = get_chat(State(state.clone()), path("nope")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let request = RenameChatRequest {
            title: "x".to_string(),
        };
        let err = rename_chat(State(state.clone()), path("nope"), Json(request))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = delete_chat(State(state.clone()), path("nope")).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body["error"], "Chat not found: nope");

        assert_eq!(state.store.read().await.len(), 8);
    }

    #[tokio::test]
    async fn test_rename_and_delete() {
        let state = seeded();
        let request = RenameChatRequest {
            title: "Renamed".to_string(),
        };

        let status = rename_chat(State(state.clone()), path("chat-2"), Json(request))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        let Json(chat) = get_chat(State(state.clone()), path("chat-2")).await.unwrap();
        assert_eq!(chat.title, "Renamed");

        let status = delete_chat(State(state.clone()), path("chat-2")).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(get_chat(State(state), path("chat-2")).await.is_err());
    }

    #[tokio::test]
    async fn test_prompt_appends_user_and_reply() {
        let state = seeded();
        let chat = create_empty(&state).await;

        let request = PromptRequest {
            text: "abcd".to_string(),
            model: None,
        };
        let (status, Json(response)) = prompt(State(state.clone()), path(chat.id.as_str()), Json(request))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.model, "openai/gpt-4o");
        assert_eq!(response.user.text(), "abcd");
        assert_eq!(response.assistant.role, ChatRole::Assistant);
        assert_eq!(response.assistant.text(), MOCK_RESPONSES[4]);

        let Json(chat) = get_chat(State(state), path(chat.id.as_str())).await.unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.title, "abcd");
    }

    #[tokio::test]
    async fn test_prompt_rejects_unknown_model() {
        let state = seeded();
        let request = PromptRequest {
            text: "hi".to_string(),
            model: Some("meta/llama".to_string()),
        };

        let err = prompt(State(state.clone()), path("chat-1"), Json(request))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let store = state.store.read().await;
        assert_eq!(store.chat(&ChatId::new("chat-1")).unwrap().messages.len(), 4);
    }

    #[tokio::test]
    async fn test_add_message() {
        let state = seeded();
        let request = AddMessageRequest {
            role: ChatRole::User,
            text: "follow-up".to_string(),
        };

        let (status, Json(message)) = add_message(State(state.clone()), path("chat-3"), Json(request))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(message.text(), "follow-up");

        let Json(chat) = get_chat(State(state), path("chat-3")).await.unwrap();
        assert_eq!(chat.messages.last().unwrap().id, message.id);
        assert_eq!(chat.title, "Debug my React useEffect loop");
    }

    #[tokio::test]
    async fn test_grouped_chats_cover_store() {
        let state = seeded();
        let Json(groups) = grouped_chats(State(state)).await;

        let total: usize = groups.iter().map(|g| g.chats.len()).sum();
        assert_eq!(total, 8);
        assert!(groups.iter().all(|g| !g.chats.is_empty()));
    }

    #[tokio::test]
    async fn test_set_active_chat() {
        let state = seeded();

        let request = ActiveChat {
            chat_id: Some(ChatId::new("chat-4")),
        };
        let Json(active) = set_active_chat(State(state.clone()), Json(request)).await.unwrap();
        assert_eq!(active.chat_id, Some(ChatId::new("chat-4")));

        let request = ActiveChat {
            chat_id: Some(ChatId::new("nope")),
        };
        let err = set_active_chat(State(state.clone()), Json(request)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let Json(active) = set_active_chat(State(state.clone()), Json(ActiveChat::default()))
            .await
            .unwrap();
        assert_eq!(active.chat_id, None);
    }

    #[tokio::test]
    async fn test_deleting_active_chat_clears_selection() {
        let state = seeded();
        let chat = create_empty(&state).await;

        delete_chat(State(state.clone()), path(chat.id.as_str())).await.unwrap();

        let Json(active) = get_active_chat(State(state)).await;
        assert_eq!(active.chat_id, None);
    }
}
