//! chatdeck Server Library
//!
//! This crate serves the chat store over HTTP, together with magic-link
//! sign-in, onboarding, the route guard and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod http;
pub mod metrics;
pub mod state;

pub use config::{Config, ConfigError};
pub use state::AppState;
