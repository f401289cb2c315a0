//! # mementum-client
//!
//! Typed clients for the mementum backend, built on
//! [`mementum_auth::AuthClient`].
//!
//! Every client here shares one [`AuthClient`](mementum_auth::AuthClient), so
//! a burst of requests that hit an expired session triggers one refresh in
//! total, whichever client sent them.
//!
//! ## Core Concepts
//!
//! - **[`AuthApi`]**: Session status, logout and Google account linking
//! - **[`NotesApi`]**: Notes, categories and the AI agent
//! - **[`CalendarApi`]**: The linked Google calendar
//! - **[`SessionStore`]**: Who is signed in, published on a watch channel
//! - **[`QuickCapture`]**: Save selected page text as a note
//!
//! ## Example
//!
//! ```ignore
//! use mementum_auth::{AuthClient, ClientConfig};
//! use mementum_client::{NotesApi, SessionStore, AuthApi};
//! use std::sync::Arc;
//!
//! let client = Arc::new(AuthClient::new(ClientConfig::from_env()?)?);
//! let auth = AuthApi::new(Arc::clone(&client));
//! let session = SessionStore::new();
//!
//! if session.check_auth(&auth).await.is_authenticated() {
//!     let notes = NotesApi::new(client).list().await?;
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth_api;
pub mod calendar_api;
pub mod capture;
pub mod notes_api;
pub mod session;

// Re-exports
pub use auth_api::{AuthApi, SessionProbe};
pub use calendar_api::{CalendarApi, DEFAULT_CALENDAR_ID};
pub use capture::{compose, prepare, CharUsage, QuickCapture, MAX_CAPTURE_CHARS};
pub use notes_api::NotesApi;
pub use session::{SessionState, SessionStore, HOME_PATH, NOTES_PATH};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AuthApi, CalendarApi, NotesApi, QuickCapture, SessionProbe, SessionState, SessionStore,
    };
}
