//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};

use chatdeck_core::{ChatStore, Clock, StoreEvent, SystemClock, User, UserId};

use crate::auth::{generate_token, hash_token, MagicLinkToken, Session};
use crate::config::Config;

/// A freshly created session, with the only copy of its plaintext token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Shared application state.
pub struct AppState {
    pub config: Config,

    /// The chat store. One lock covers the chat list and the active id.
    pub store: RwLock<ChatStore>,

    /// Store changes, fanned out to SSE subscribers.
    pub events: broadcast::Sender<StoreEvent>,

    /// Users indexed by UserId.
    pub users: RwLock<HashMap<UserId, User>>,

    /// Pending magic links indexed by token hash.
    pub magic_links: RwLock<HashMap<String, MagicLinkToken>>,

    /// Sessions indexed by token hash.
    pub sessions: RwLock<HashMap<String, Session>>,

    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new AppState wrapped in Arc, using the system clock.
    pub fn new(config: Config) -> Arc<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new AppState with an explicit time source.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Arc<Self> {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));

        let mut store = if config.seed_chats {
            ChatStore::seeded(clock.clone())
        } else {
            ChatStore::new(clock.clone())
        };

        let sender = events.clone();
        store.subscribe(Box::new(move |event: &StoreEvent| {
            // No receivers is fine: nobody is listening right now.
            let _ = sender.send(event.clone());
        }));

        Arc::new(Self {
            config,
            store: RwLock::new(store),
            events,
            users: RwLock::new(HashMap::new()),
            magic_links: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            clock,
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create a magic link for `email` and return its plaintext token.
    pub async fn issue_magic_link(&self, email: &str) -> String {
        let now = self.now();
        let (token, token_hash) = generate_token();
        let link = MagicLinkToken::new(
            token_hash.clone(),
            email.to_lowercase(),
            now,
            self.config.magic_link_ttl(),
        );

        let mut links = self.magic_links.write().await;
        links.retain(|_, existing| existing.is_valid(now));
        links.insert(token_hash, link);
        token
    }

    /// Redeem a magic link, creating the user on first sign-in.
    ///
    /// Returns `None` for unknown, expired or already used links.
    pub async fn redeem_magic_link(&self, token: &str) -> Option<IssuedSession> {
        let now = self.now();
        let email = {
            let mut links = self.magic_links.write().await;
            links.retain(|_, link| link.is_valid(now));
            links.remove(&hash_token(token))?.email
        };

        let user = {
            let mut users = self.users.write().await;
            let existing = users.values().find(|user| user.email == email).cloned();
            match existing {
                Some(user) => user,
                None => {
                    let user = User::new(email, "", now);
                    users.insert(user.id.clone(), user.clone());
                    user
                }
            }
        };

        let (token, token_hash) = generate_token();
        let session = Session::new(token_hash.clone(), user.id.clone(), now, self.config.session_ttl());
        let expires_at = session.expires_at;

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| session.is_valid(now));
        sessions.insert(token_hash, session);
        drop(sessions);

        Some(IssuedSession {
            token,
            expires_at,
            user,
        })
    }

    /// Resolve a session token to its user.
    pub async fn session_user(&self, token: &str) -> Option<User> {
        let user_id = {
            let sessions = self.sessions.read().await;
            let session = sessions.get(&hash_token(token))?;
            if !session.is_valid(self.now()) {
                return None;
            }
            session.user_id.clone()
        };
        self.users.read().await.get(&user_id).cloned()
    }

    /// End a session. Returns `false` if the token was unknown.
    pub async fn revoke_session(&self, token: &str) -> bool {
        self.sessions.write().await.remove(&hash_token(token)).is_some()
    }

    /// Get the number of sessions that have not expired.
    pub async fn active_session_count(&self) -> usize {
        let now = self.now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|session| session.is_valid(now))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatdeck_core::ManualClock;
    use chrono::Duration;

    fn state_with_clock() -> (Arc<AppState>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (AppState::with_clock(Config::default(), clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_seeded_store() {
        let state = AppState::new(Config::default());
        assert_eq!(state.store.read().await.len(), 8);

        let config = Config {
            seed_chats: false,
            ..Config::default()
        };
        let state = AppState::new(config);
        assert!(state.store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_store_events_are_broadcast() {
        let state = AppState::new(Config::default());
        let mut receiver = state.events.subscribe();

        let chat = state.store.write().await.create_chat(None);

        let event = receiver.recv().await.unwrap();
        assert_eq!(event, StoreEvent::ChatCreated { chat_id: chat.id });
    }

    #[tokio::test]
    async fn test_magic_link_round_trip() {
        let (state, _) = state_with_clock();

        let token = state.issue_magic_link("Ada@Example.com").await;
        let issued = state.redeem_magic_link(&token).await.unwrap();
        assert_eq!(issued.user.email, "ada@example.com");
        assert!(!issued.user.onboarding_completed);

        let user = state.session_user(&issued.token).await.unwrap();
        assert_eq!(user.id, issued.user.id);

        // Links are single-use.
        assert!(state.redeem_magic_link(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_second_sign_in_reuses_user() {
        let (state, _) = state_with_clock();

        let first = state.issue_magic_link("ada@example.com").await;
        let first = state.redeem_magic_link(&first).await.unwrap();
        let second = state.issue_magic_link("ada@example.com").await;
        let second = state.redeem_magic_link(&second).await.unwrap();

        assert_eq!(first.user.id, second.user.id);
        assert_eq!(state.users.read().await.len(), 1);
        assert_eq!(state.active_session_count().await, 2);
    }

    #[tokio::test]
    async fn test_expired_link_and_session() {
        let (state, clock) = state_with_clock();

        let token = state.issue_magic_link("ada@example.com").await;
        clock.advance(Duration::minutes(16));
        assert!(state.redeem_magic_link(&token).await.is_none());

        let token = state.issue_magic_link("ada@example.com").await;
        let issued = state.redeem_magic_link(&token).await.unwrap();
        clock.advance(Duration::hours(24 * 8));
        assert!(state.session_user(&issued.token).await.is_none());
        assert_eq!(state.active_session_count().await, 0);
    }

    #[tokio::test]
    async fn test_dead_links_and_sessions_are_dropped() {
        let (state, clock) = state_with_clock();

        for _ in 0..20 {
            let token = state.issue_magic_link("ada@example.com").await;
            state.redeem_magic_link(&token).await.unwrap();
        }
        for _ in 0..20 {
            state.issue_magic_link("grace@example.com").await;
        }
        // Redeemed links are gone straight away.
        assert_eq!(state.magic_links.read().await.len(), 20);
        assert_eq!(state.sessions.read().await.len(), 20);

        clock.advance(Duration::days(30));
        let token = state.issue_magic_link("ada@example.com").await;
        assert_eq!(state.magic_links.read().await.len(), 1);

        state.redeem_magic_link(&token).await.unwrap();
        assert_eq!(state.magic_links.read().await.len(), 0);
        assert_eq!(state.sessions.read().await.len(), 1);
        assert_eq!(state.active_session_count().await, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_does_not_panic() {
        let config = Config {
            magic_link_ttl_minutes: u64::MAX,
            session_ttl_hours: u64::MAX,
            ..Config::default()
        };
        let state = AppState::new(config);

        let token = state.issue_magic_link("ada@example.com").await;
        let issued = state.redeem_magic_link(&token).await.unwrap();
        assert!(state.session_user(&issued.token).await.is_some());
    }

    #[tokio::test]
    async fn test_revoke_session() {
        let (state, _) = state_with_clock();
        let token = state.issue_magic_link("ada@example.com").await;
        let issued = state.redeem_magic_link(&token).await.unwrap();

        assert!(state.revoke_session(&issued.token).await);
        assert!(!state.revoke_session(&issued.token).await);
        assert!(state.session_user(&issued.token).await.is_none());
    }
}
