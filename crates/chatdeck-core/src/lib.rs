//! chatdeck Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Database
//! - Async runtime
//!
//! The centrepiece is [`ChatStore`], the in-memory collection of chat
//! sessions with its active selection and chronological grouping.

pub mod api;
pub mod auth;
pub mod chat;
pub mod clock;
pub mod error;
pub mod grouping;
pub mod ids;
pub mod mock;
pub mod models;
pub mod seed;
pub mod store;

// Re-export commonly used types
pub use auth::{guard_route, RouteDecision, User};
pub use chat::{Chat, ChatMessage, ChatRole, ChatSummary, MessagePart, DEFAULT_CHAT_TITLE};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CoreError;
pub use grouping::{group_chats, BucketBoundaries, ChatBucket, ChatGroup};
pub use ids::{ChatId, MessageId, UserId};
pub use mock::mock_response;
pub use models::{find_model, ModelOption, DEFAULT_MODEL, MODELS};
pub use store::{ChatStore, StoreEvent, SubscriptionId};
