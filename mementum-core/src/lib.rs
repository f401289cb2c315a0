//! # mementum-core
//!
//! Core domain records for the mementum client.
//!
//! This crate holds the types shared by every other mementum crate:
//!
//! - **Session**: the authenticated user as reported by the backend
//! - **Notes**: notes, drafts, categories and AI agent payloads
//! - **Calendar**: events, calendars and event queries
//! - **Identifiers**: type-safe IDs for notes and users
//! - **Errors**: domain validation failures
//!
//! Nothing here performs I/O.
//!
//! ## Example
//!
//! ```rust
//! use mementum_core::{NoteDraft, NoteId};
//!
//! let draft = NoteDraft::new("Buy milk").with_title("Errands");
//! assert_eq!(draft.title.as_deref(), Some("Errands"));
//!
//! let id = NoteId::new(42);
//! assert_eq!(id.to_string(), "42");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod calendar;
pub mod errors;
pub mod identifier;
pub mod notes;
pub mod session;
pub mod timestamp;

// Re-exports for convenience
pub use calendar::{
    Attendee, Calendar, CalendarEvent, EventCreator, EventDateTime, EventQuery,
    GoogleCalendarUser, NewCalendarEvent,
};
pub use errors::ValidationError;
pub use identifier::{NoteId, UserId};
pub use notes::{
    AgentRequest, AgentResponse, AnalyzeAllReport, AnalyzedNote, CalendarAnalysis,
    CategoryCount, CategoryList, CategoryNotes, Note, NoteCalendarEvent, NoteCalendarEvents,
    NoteCount, NoteDraft, NoteGroups, NoteUpdate,
};
pub use session::{AuthStatus, Registration, SessionUser};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::calendar::{CalendarEvent, EventDateTime, EventQuery, NewCalendarEvent};
    pub use crate::errors::ValidationError;
    pub use crate::identifier::{NoteId, UserId};
    pub use crate::notes::{Note, NoteDraft, NoteUpdate};
    pub use crate::session::{AuthStatus, Registration, SessionUser};
}
