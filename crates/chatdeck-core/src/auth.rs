//! Users, onboarding and the page route guard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::UserId;

pub const LOGIN_PATH: &str = "/login";
pub const ONBOARDING_PATH: &str = "/onboarding";
pub const HOME_PATH: &str = "/";

/// A signed-up user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    /// Set once the user has picked a display name.
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user who has not been through onboarding yet.
    pub fn new(email: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            name: name.into(),
            avatar_url: None,
            onboarding_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the display name and mark onboarding as done.
    ///
    /// The name is trimmed; a blank name is rejected and leaves the user untouched.
    pub fn complete_onboarding(&mut self, name: &str, now: DateTime<Utc>) -> Result<(), CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("Name is required".to_string()));
        }
        self.name = name.to_string();
        self.onboarding_completed = true;
        self.updated_at = now;
        Ok(())
    }
}

/// Outcome of checking a page navigation against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "to", rename_all = "snake_case")]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

/// Decide where a navigation to `path` should land.
///
/// Anonymous visitors may only see the login page; signed-in users are kept
/// off the login page and held on onboarding until it is completed.
pub fn guard_route(session: Option<&User>, path: &str) -> RouteDecision {
    match session {
        None if path != LOGIN_PATH => RouteDecision::Redirect(LOGIN_PATH),
        None => RouteDecision::Allow,
        Some(_) if path == LOGIN_PATH => RouteDecision::Redirect(HOME_PATH),
        Some(user) if !user.onboarding_completed && path != ONBOARDING_PATH => {
            RouteDecision::Redirect(ONBOARDING_PATH)
        }
        Some(user) if user.onboarding_completed && path == ONBOARDING_PATH => {
            RouteDecision::Redirect(HOME_PATH)
        }
        Some(_) => RouteDecision::Allow,
    }
}
