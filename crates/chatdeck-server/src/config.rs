//! Server configuration.

use chrono::Duration;
use thiserror::Error;

/// A configuration value the server cannot run with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be a positive duration that fits in a timestamp, got {value}")]
    InvalidTtl { field: &'static str, value: u64 },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address.
    pub http_bind_addr: String,

    /// Externally reachable base URL, used to build magic links.
    pub public_base_url: String,

    /// How long a magic link stays redeemable (minutes).
    pub magic_link_ttl_minutes: u64,

    /// How long a session token stays valid (hours).
    pub session_ttl_hours: u64,

    /// Seed the chat store with the demo conversations.
    pub seed_chats: bool,

    /// Capacity of the store event broadcast channel.
    pub event_buffer: usize,

    /// Return magic links in the HTTP response as well as logging them.
    /// Only meant for local development.
    pub expose_magic_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_bind_addr: "127.0.0.1:3000".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            magic_link_ttl_minutes: 15,
            session_ttl_hours: 24 * 7,
            seed_chats: true,
            event_buffer: 256,
            expose_magic_links: false,
        }
    }
}

impl Config {
    /// Magic link lifetime, saturating when the configured value is out of range.
    pub fn magic_link_ttl(&self) -> Duration {
        ttl(self.magic_link_ttl_minutes, Duration::try_minutes)
    }

    /// Session lifetime, saturating when the configured value is out of range.
    pub fn session_ttl(&self) -> Duration {
        ttl(self.session_ttl_hours, Duration::try_hours)
    }

    /// Reject lifetimes that are zero or too large to represent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ttl("magic_link_ttl_minutes", self.magic_link_ttl_minutes, Duration::try_minutes)?;
        check_ttl("session_ttl_hours", self.session_ttl_hours, Duration::try_hours)
    }
}

fn ttl(value: u64, unit: fn(i64) -> Option<Duration>) -> Duration {
    i64::try_from(value)
        .ok()
        .and_then(unit)
        .unwrap_or(Duration::MAX)
}

fn check_ttl(
    field: &'static str,
    value: u64,
    unit: fn(i64) -> Option<Duration>,
) -> Result<(), ConfigError> {
    let representable = i64::try_from(value)
        .ok()
        .and_then(unit)
        .and_then(|ttl| chrono::DateTime::<chrono::Utc>::MIN_UTC.checked_add_signed(ttl))
        .is_some();
    if value == 0 || !representable {
        return Err(ConfigError::InvalidTtl { field, value });
    }
    Ok(())
}
