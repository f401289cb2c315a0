//! Note records and AI agent payloads.

use crate::identifier::{NoteId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored note.
///
/// List and detail endpoints return different subsets of these fields, so
/// everything except `id` and `content` is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Note id.
    pub id: NoteId,
    /// Owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Title, generated by the AI agent when not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    pub content: String,
    /// Category assigned by analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Importance from 1 to 10, assigned by analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<u8>,
    /// Suggested tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Creation time.
    #[serde(default, with = "crate::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time.
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Title, or the first line of the content when untitled.
    #[must_use]
    pub fn heading(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.content.lines().next().unwrap_or_default())
    }
}

/// Payload for creating a note directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    /// Optional title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    pub content: String,
}

impl NoteDraft {
    /// Create a draft with content only.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: content.into(),
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Partial update of a note. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NoteUpdate {
    /// Create an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Response of the note count endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCount {
    /// Number of notes owned by the user.
    pub count: u64,
}

/// One category and how many notes it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category name.
    pub name: String,
    /// Number of notes.
    pub count: u64,
}

/// Response of the categories endpoint, most populated first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryList {
    /// Categories.
    #[serde(default)]
    pub categories: Vec<CategoryCount>,
}

/// Every note of the user, keyed by category.
///
/// Notes without a category are filed under `General` by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteGroups {
    /// Notes per category.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<Note>>,
}

/// Notes within a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNotes {
    /// Category name.
    pub category: String,
    /// Notes, most important first. Content may be truncated by the backend.
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// Request to the AI agent that structures free text into a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Raw user text.
    pub message: String,
    /// Let the backend schedule follow-up analysis in the background.
    #[serde(default)]
    pub enable_background_tasks: bool,
}

impl AgentRequest {
    /// Create a request without background tasks.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            enable_background_tasks: false,
        }
    }

    /// Enable background tasks.
    #[must_use]
    pub fn with_background_tasks(mut self) -> Self {
        self.enable_background_tasks = true;
        self
    }
}

/// Response of the AI agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Whether processing succeeded.
    #[serde(default)]
    pub success: bool,
    /// Human-readable result message.
    #[serde(default)]
    pub message: String,
    /// Extra agent output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Id of the created note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<NoteId>,
    /// Some deployments answer with the note itself and only set `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    /// Category assigned to the note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Importance from 1 to 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<u8>,
}

impl AgentResponse {
    /// Id of the created note, whichever field carried it.
    #[must_use]
    pub fn created_note_id(&self) -> Option<NoteId> {
        self.note_id.or(self.id)
    }
}

/// A note summary as returned by bulk analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedNote {
    /// Note id.
    pub id: NoteId,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Assigned category.
    #[serde(default)]
    pub category: Option<String>,
    /// Assigned importance.
    #[serde(default)]
    pub importance: Option<u8>,
    /// Suggested tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Extracted keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Response of the analyze-all endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeAllReport {
    /// Whether the run completed.
    pub success: bool,
    /// Number of notes analysed successfully.
    pub analyzed_count: u64,
    /// Per-note results.
    #[serde(default)]
    pub notes: Vec<AnalyzedNote>,
}

/// A calendar event the AI agent derived from a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteCalendarEvent {
    /// Local event id.
    pub id: i64,
    /// Id of the event in Google Calendar.
    pub google_event_id: String,
    /// Event title.
    pub title: String,
    /// Event description.
    #[serde(default)]
    pub description: Option<String>,
    /// Start time.
    #[serde(default, with = "crate::timestamp::option")]
    pub start_datetime: Option<DateTime<Utc>>,
    /// End time.
    #[serde(default, with = "crate::timestamp::option")]
    pub end_datetime: Option<DateTime<Utc>>,
    /// Location.
    #[serde(default)]
    pub location: Option<String>,
    /// Whether the event spans whole days.
    #[serde(default)]
    pub is_all_day: bool,
    /// Whether the agent created the event.
    #[serde(default)]
    pub created_by_ai: bool,
}

/// Calendar events linked to one note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteCalendarEvents {
    /// The note.
    pub note_id: NoteId,
    /// Linked events.
    #[serde(default)]
    pub events: Vec<NoteCalendarEvent>,
}

/// Result of re-analysing a note for calendar events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarAnalysis {
    /// Human-readable result message.
    pub message: String,
    /// Number of events created.
    pub events_count: u64,
}
