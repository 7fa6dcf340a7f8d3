//! HTTP server.
//!
//! Provides endpoints for:
//! - Chats (`/v1/chats`, `/v1/active`, `/v1/events`)
//! - Model catalog (`/v1/models`)
//! - Sign-in, session and onboarding (`/v1/auth`, `/v1/session`, `/v1/user`)
//! - Route guard (`/v1/route-guard`)
//! - Health check (`/health`)
//! - Prometheus metrics (`/metrics`)

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod handlers;
pub mod responses;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // The browser front end is served from a different origin in development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Chat routes
        .route(
            "/v1/chats",
            get(handlers::list_chats).post(handlers::create_chat),
        )
        .route("/v1/chats/grouped", get(handlers::grouped_chats))
        .route(
            "/v1/chats/:chat_id",
            get(handlers::get_chat)
                .patch(handlers::rename_chat)
                .delete(handlers::delete_chat),
        )
        .route("/v1/chats/:chat_id/messages", post(handlers::add_message))
        .route("/v1/chats/:chat_id/prompt", post(handlers::prompt))
        .route(
            "/v1/active",
            get(handlers::get_active_chat).put(handlers::set_active_chat),
        )
        .route("/v1/events", get(handlers::store_events))
        .route("/v1/models", get(handlers::list_models))
        // Auth routes
        .route("/v1/auth/magic-link", post(handlers::request_magic_link))
        .route("/v1/auth/magic-link/verify", get(handlers::verify_magic_link))
        .route("/v1/auth/sign-out", post(handlers::sign_out))
        .route("/v1/session", get(handlers::current_session))
        .route(
            "/v1/user/complete-onboarding",
            post(handlers::complete_onboarding),
        )
        .route("/v1/route-guard", get(handlers::route_guard))
        // Observability routes
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
