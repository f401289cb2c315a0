//! Process-wide session state.
//!
//! [`SessionStore`] caches who is signed in and publishes changes on a
//! [`watch`] channel, so views can react without polling. It never talks to
//! the network on its own: callers pass a [`SessionProbe`] to the operations
//! that need one.

use crate::auth_api::SessionProbe;
use mementum_core::SessionUser;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Where a view is sent when the user signs in or out.
pub const HOME_PATH: &str = "/";
/// Landing page for signed-in users.
pub const NOTES_PATH: &str = "/notes";

/// Pages that only make sense before sign-in.
const GUEST_PATHS: [&str; 3] = ["/", "/login", "/register"];
/// Path prefixes that need a session.
const PROTECTED_PREFIXES: [&str; 3] = ["/notes", "/calendar", "/profile"];

/// What is known about the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Not checked yet.
    Loading,
    /// Signed in.
    Authenticated(SessionUser),
    /// Signed out, expired, or the check failed.
    Anonymous,
}

impl SessionState {
    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The signed-in user.
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Where a view at `path` should go, if anywhere.
    ///
    /// Signed-in users are moved off the guest pages to their notes; anonymous
    /// users are moved off protected pages to the home page. Nothing moves
    /// while the session is still loading.
    pub fn redirect_for(&self, path: &str) -> Option<&'static str> {
        match self {
            Self::Loading => None,
            Self::Authenticated(_) if GUEST_PATHS.contains(&path) => Some(NOTES_PATH),
            Self::Anonymous
                if PROTECTED_PREFIXES
                    .iter()
                    .any(|prefix| path.starts_with(prefix)) =>
            {
                Some(HOME_PATH)
            }
            _ => None,
        }
    }
}

/// Holder of the current [`SessionState`].
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store in the [`SessionState::Loading`] state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self { state }
    }

    /// Receive every later state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<SessionUser> {
        self.state.borrow().user().cloned()
    }

    /// Ask the backend who is signed in. Any failure counts as signed out.
    pub async fn check_auth(&self, probe: &dyn SessionProbe) -> SessionState {
        let next = match probe.status().await {
            Ok(status) => {
                debug!(user_id = %status.user.id, "Session is valid");
                SessionState::Authenticated(status.user)
            }
            Err(err) => {
                debug!(error = %err, "No valid session");
                SessionState::Anonymous
            }
        };
        self.state.send_replace(next.clone());
        next
    }

    /// Sign out. The local state ends anonymous even if the backend call
    /// fails.
    pub async fn logout(&self, probe: &dyn SessionProbe) {
        if let Err(err) = probe.logout().await {
            warn!(error = %err, "Logout request failed, clearing session locally");
        }
        self.state.send_replace(SessionState::Anonymous);
    }

    /// Drop the session after it could not be renewed.
    pub fn expire(&self) {
        let previous = self.state.send_replace(SessionState::Anonymous);
        if previous.is_authenticated() {
            info!("Session expired");
        }
    }

    /// Where a view at `path` should go, given the current state.
    pub fn redirect_for(&self, path: &str) -> Option<&'static str> {
        self.state.borrow().redirect_for(path)
    }
}
