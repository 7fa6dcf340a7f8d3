//! Sign-in, session and onboarding handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, warn};

use chatdeck_core::{guard_route, CoreError, User};

use crate::auth::bearer_token;
use crate::http::responses::{
    ApiError, MagicLinkRequest, MagicLinkResponse, OnboardingRequest, RouteGuardResponse,
    RouteQuery, SessionResponse, SuccessResponse, VerifyQuery,
};
use crate::state::AppState;

/// Resolve the caller's session, if any.
async fn session_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let token = bearer_token(headers)?;
    state.session_user(token).await
}

async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    session_user(state, headers).await.ok_or(ApiError::Unauthorized)
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

/// Issue a magic link. Delivery is a log line.
///
/// POST /v1/auth/magic-link
pub async fn request_magic_link(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MagicLinkRequest>,
) -> Result<Json<MagicLinkResponse>, ApiError> {
    let email = request.email.trim();
    if !is_plausible_email(email) {
        return Err(ApiError::BadRequest("A valid email is required".to_string()));
    }

    let token = state.issue_magic_link(email).await;
    let url = format!(
        "{}/v1/auth/magic-link/verify?token={}",
        state.config.public_base_url.trim_end_matches('/'),
        token
    );
    info!(email = %email, url = %url, "Magic link issued");

    Ok(Json(MagicLinkResponse {
        sent: true,
        magic_link: state.config.expose_magic_links.then_some(url),
    }))
}

/// Exchange a magic link for a session.
///
/// GET /v1/auth/magic-link/verify?token=...
pub async fn verify_magic_link(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Some(issued) = state.redeem_magic_link(&query.token).await else {
        warn!("Invalid or expired magic link presented");
        return Err(ApiError::InvalidMagicLink);
    };

    info!(user_id = %issued.user.id, "Session started");
    Ok(Json(SessionResponse {
        session_token: issued.token,
        expires_at: issued.expires_at,
        user: issued.user,
    }))
}

/// POST /v1/auth/sign-out
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthorized)?;
    if !state.revoke_session(token).await {
        return Err(ApiError::Unauthorized);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user.
///
/// GET /v1/session
pub async fn current_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<User>, ApiError> {
    require_user(&state, &headers).await.map(Json)
}

/// POST /v1/user/complete-onboarding
pub async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<OnboardingRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let session = require_user(&state, &headers).await?;
    let name = request.name.unwrap_or_default();

    let mut users = state.users.write().await;
    let user = users
        .get_mut(&session.id)
        .ok_or_else(|| CoreError::UserNotFound(session.id.to_string()))?;
    user.complete_onboarding(&name, state.now())?;

    info!(user_id = %user.id, "Onboarding completed");
    Ok(Json(SuccessResponse { success: true }))
}

/// Where a page navigation should go for the caller's session.
///
/// GET /v1/route-guard?path=...
pub async fn route_guard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RouteQuery>,
) -> Json<RouteGuardResponse> {
    let user = session_user(&state, &headers).await;
    let decision = guard_route(user.as_ref(), &query.path);
    Json(RouteGuardResponse {
        path: query.path,
        decision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::{header, HeaderValue};
    use chatdeck_core::RouteDecision;

    fn state() -> Arc<AppState> {
        AppState::new(Config {
            expose_magic_links: true,
            ..Config::default()
        })
    }

    fn auth_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    async fn sign_in(state: &Arc<AppState>) -> String {
        let request = MagicLinkRequest {
            email: "ada@example.com".to_string(),
        };
        let Json(response) = request_magic_link(State(state.clone()), Json(request))
            .await
            .unwrap();
        let link = response.magic_link.unwrap();
        let token = link.split("token=").nth(1).unwrap().to_string();

        let Json(session) = verify_magic_link(State(state.clone()), Query(VerifyQuery { token }))
            .await
            .unwrap();
        session.session_token
    }

    async fn guard(state: &Arc<AppState>, headers: HeaderMap, path: &str) -> RouteDecision {
        let query = RouteQuery {
            path: path.to_string(),
        };
        let Json(response) = route_guard(State(state.clone()), headers, Query(query)).await;
        response.decision
    }

    #[tokio::test]
    async fn test_magic_link_hidden_by_default() {
        let state = AppState::new(Config::default());
        let request = MagicLinkRequest {
            email: "ada@example.com".to_string(),
        };
        let Json(response) = request_magic_link(State(state), Json(request)).await.unwrap();
        assert!(response.sent);
        assert!(response.magic_link.is_none());
    }

    #[tokio::test]
    async fn test_magic_link_requires_email() {
        let request = MagicLinkRequest {
            email: "  not-an-email ".to_string(),
        };
        let err = request_magic_link(State(state()), Json(request)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_magic_link_is_401() {
        let query = VerifyQuery {
            token: "bogus".to_string(),
        };
        let err = verify_magic_link(State(state()), Query(query)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_onboarding_requires_session() {
        let request = OnboardingRequest {
            name: Some("Ada".to_string()),
        };
        let err = complete_onboarding(State(state()), HeaderMap::new(), Json(request))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_onboarding_requires_name() {
        let state = state();
        let token = sign_in(&state).await;

        for name in [None, Some("   ".to_string())] {
            let request = OnboardingRequest { name };
            let err = complete_onboarding(State(state.clone()), auth_headers(&token), Json(request))
                .await
                .unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_string(), "Name is required");
        }
    }

    #[tokio::test]
    async fn test_onboarding_flow_drives_route_guard() {
        let state = state();

        assert_eq!(
            guard(&state, HeaderMap::new(), "/").await,
            RouteDecision::Redirect("/login")
        );

        let token = sign_in(&state).await;
        assert_eq!(
            guard(&state, auth_headers(&token), "/").await,
            RouteDecision::Redirect("/onboarding")
        );

        let request = OnboardingRequest {
            name: Some(" Ada ".to_string()),
        };
        let Json(done) = complete_onboarding(State(state.clone()), auth_headers(&token), Json(request))
            .await
            .unwrap();
        assert!(done.success);

        let Json(user) = current_session(State(state.clone()), auth_headers(&token))
            .await
            .unwrap();
        assert_eq!(user.name, "Ada");
        assert!(user.onboarding_completed);

        assert_eq!(guard(&state, auth_headers(&token), "/").await, RouteDecision::Allow);
        assert_eq!(
            guard(&state, auth_headers(&token), "/onboarding").await,
            RouteDecision::Redirect("/")
        );
    }

    #[tokio::test]
    async fn test_sign_out_ends_session() {
        let state = state();
        let token = sign_in(&state).await;

        let status = sign_out(State(state.clone()), auth_headers(&token)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = current_session(State(state.clone()), auth_headers(&token))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(sign_out(State(state), auth_headers(&token)).await.is_err());
    }
}
