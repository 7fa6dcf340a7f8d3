//! Magic-link and session tokens.
//!
//! Magic links are single-use, time-limited tokens that are exchanged for a
//! session token; redeeming one removes it. Both kinds of token are handed
//! out in plaintext exactly once; the server only keeps their SHA-256 hash.

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use chatdeck_core::UserId;

/// A pending magic link.
#[derive(Debug, Clone)]
pub struct MagicLinkToken {
    /// SHA-256 hash of the token (hex encoded).
    pub token_hash: String,

    /// Address the link was sent to (lowercased).
    pub email: String,

    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl MagicLinkToken {
    pub fn new(token_hash: String, email: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token_hash,
            email,
            created_at: now,
            expires_at: expiry(now, ttl),
        }
    }

    /// Check if the link can still be redeemed.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// A signed-in session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token_hash: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token_hash: String, user_id: UserId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token_hash,
            user_id,
            created_at: now,
            expires_at: expiry(now, ttl),
        }
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// `now + ttl`, clamped to the latest representable instant.
fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Generate a new random token.
///
/// Returns a tuple of (plaintext_token, token_hash).
pub fn generate_token() -> (String, String) {
    // 256 bits of randomness
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut token_bytes);

    let plaintext = URL_SAFE_NO_PAD.encode(token_bytes);
    let token_hash = hash_token(&plaintext);

    (plaintext, token_hash)
}

/// Hash a token using SHA-256.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
