//! Domain validation errors.
//!
//! These are raised before any request leaves the client, so they never carry
//! HTTP details.

use thiserror::Error;

/// A value was rejected before it could be sent to the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Note content was empty after trimming.
    #[error("Note content must not be empty")]
    EmptyContent,

    /// Note content exceeded the capture limit.
    #[error("Note content is {len} characters, limit is {max}")]
    ContentTooLong {
        /// Length of the rejected content, in characters.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Calendar event had no summary.
    #[error("Event summary must not be empty")]
    EmptySummary,

    /// Calendar event ends before it starts.
    #[error("Event ends before it starts")]
    InvalidTimeRange,
}
