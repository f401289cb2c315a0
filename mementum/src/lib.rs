//! # mementum
//!
//! Rust client for the mementum notes backend.
//!
//! The backend keeps the user's session in an HTTP-only cookie and turns
//! free text into structured notes with an AI agent. This crate bundles the
//! pieces an application needs to use it:
//!
//! - a session-aware transport that renews an expired session once and
//!   replays the failed request, sharing one refresh across every request
//!   that failed at the same time
//! - typed clients for notes, categories, the AI agent and Google Calendar
//! - a session store that tells views who is signed in and where to redirect
//! - quick capture of text selected in the browser
//!
//! ## Quick Start
//!
//! ```ignore
//! use mementum::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ClientError> {
//!     mementum::telemetry::init_tracing();
//!
//!     let app = Mementum::builder(ClientConfig::from_env()?)
//!         .on_signed_out(|_| println!("please sign in again"))
//!         .build()?;
//!
//!     if app.check_auth().await.is_authenticated() {
//!         for note in app.notes().recent().await? {
//!             println!("{}", note.heading());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `mementum-core` | Domain records and validation |
//! | `mementum-auth` | Transport, refresh coordination, config, errors |
//! | `mementum-client` | Typed clients, session store, quick capture |
//! | `mementum` | This facade |
//!
//! ## Configuration
//!
//! [`ClientConfig::from_env`] reads `MEMENTUM_API_URL`,
//! `MEMENTUM_WEB_APP_URL` and `MEMENTUM_TIMEOUT_SECS`. Log output is
//! filtered by `MEMENTUM_LOG`, falling back to `RUST_LOG`.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod telemetry;

pub use app::{Mementum, MementumBuilder};

pub use mementum_auth::{
    ApiRequest, AuthClient, AuthClientBuilder, ClientConfig, ClientError, ClientResult,
    Endpoints, RefreshCoordinator, RefreshOutcome, RefreshState,
};
pub use mementum_client::{
    compose, AuthApi, CalendarApi, CharUsage, NotesApi, QuickCapture, SessionProbe,
    SessionState, SessionStore, MAX_CAPTURE_CHARS,
};
pub use mementum_core::{
    AgentResponse, AuthStatus, Calendar, CalendarEvent, CategoryCount, EventDateTime,
    EventQuery, GoogleCalendarUser, NewCalendarEvent, Note, NoteDraft, NoteId, NoteUpdate,
    Registration, SessionUser, UserId, ValidationError,
};

// ============================================================================
// Member Crate Re-exports
// ============================================================================

/// Domain records and validation errors.
pub use mementum_core as core;

/// Session-aware transport, configuration and errors.
pub use mementum_auth as auth;

/// Typed clients, session store and quick capture.
pub use mementum_client as client;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ClientConfig, ClientError, ClientResult, EventQuery, Mementum, NewCalendarEvent, Note,
        NoteDraft, NoteId, NoteUpdate, SessionState,
    };
}
