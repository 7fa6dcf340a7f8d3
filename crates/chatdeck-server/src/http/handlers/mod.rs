//! HTTP request handlers.

mod auth;
mod chats;
mod events;
mod health;
mod models;

pub use auth::{
    complete_onboarding, current_session, request_magic_link, route_guard, sign_out,
    verify_magic_link,
};
pub use chats::{
    add_message, create_chat, delete_chat, get_active_chat, get_chat, grouped_chats, list_chats,
    prompt, rename_chat, set_active_chat,
};
pub use events::store_events;
pub use health::{health_check, metrics_handler};
pub use models::list_models;
