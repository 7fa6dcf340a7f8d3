//! HTTP request and response types that only the server needs.
//!
//! Chat bodies shared with the client live in `chatdeck_core::api`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chatdeck_core::{CoreError, RouteDecision, User};

// ============================================================================
// Error types
// ============================================================================

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid or expired magic link")]
    InvalidMagicLink,

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(CoreError::ChatNotFound(_) | CoreError::UserNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Core(CoreError::UnknownModel(_) | CoreError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized | ApiError::InvalidMagicLink => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Auth types
// ============================================================================

/// Body for `POST /v1/auth/magic-link`.
#[derive(Debug, Deserialize)]
pub struct MagicLinkRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MagicLinkResponse {
    pub sent: bool,

    /// Present only when the server is configured to expose links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic_link: Option<String>,
}

/// Query for `GET /v1/auth/magic-link/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Body for `POST /v1/user/complete-onboarding`.
#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Query for `GET /v1/route-guard`.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct RouteGuardResponse {
    pub path: String,
    pub decision: RouteDecision,
}
