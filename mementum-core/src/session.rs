//! Session records.
//!
//! The session itself lives in a server-managed cookie. These types only
//! describe what the status endpoint reports about it.

use crate::identifier::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The currently signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Account id.
    pub id: UserId,
    /// Account email.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Whether a Google account is linked.
    #[serde(default)]
    pub google_connected: bool,
    /// Name on the linked Google profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_name: Option<String>,
    /// Avatar URL of the linked Google profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_picture: Option<String>,
}

impl SessionUser {
    /// Name to greet the user with, preferring the Google profile name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.google_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Response of the session status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    /// The signed-in user.
    pub user: SessionUser,
    /// Expiry of the linked Google token, if any.
    #[serde(default, with = "crate::timestamp::option")]
    pub google_token_expires: Option<DateTime<Utc>>,
}

impl AuthStatus {
    /// Whether the linked Google token has expired at `now`.
    ///
    /// Returns `false` when no Google account is linked.
    #[must_use]
    pub fn google_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.google_token_expires.is_some_and(|expires| expires <= now)
    }
}

/// New account details for password registration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Sign-in name.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Password, sent once and never logged.
    pub password: String,
}

impl Registration {
    /// Create registration details.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}
