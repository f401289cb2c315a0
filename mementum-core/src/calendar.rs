//! Calendar records.
//!
//! Field names follow the Google Calendar wire format (`camelCase`), which
//! the backend passes through unchanged.

use crate::errors::ValidationError;
use crate::timestamp::parse_lenient;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Start or end of an event. Timed events set `date_time`, all-day events
/// set `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// RFC 3339 instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// `YYYY-MM-DD` date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// IANA time zone name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    /// A timed instant.
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            date_time: Some(instant.to_rfc3339()),
            ..Self::default()
        }
    }

    /// An all-day date.
    #[must_use]
    pub fn on(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }

    /// Set the time zone.
    #[must_use]
    pub fn with_time_zone(mut self, tz: impl Into<String>) -> Self {
        self.time_zone = Some(tz.into());
        self
    }

    /// Resolve to a UTC instant. All-day dates resolve to midnight UTC.
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.date_time
            .as_deref()
            .or(self.date.as_deref())
            .and_then(parse_lenient)
    }
}

/// An invited participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// RSVP state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

impl Attendee {
    /// An attendee identified by email only.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            response_status: None,
        }
    }
}

/// Who created an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreator {
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// An event in the user's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Event id.
    pub id: String,
    /// Title.
    #[serde(default)]
    pub summary: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Start.
    pub start: EventDateTime,
    /// End.
    pub end: EventDateTime,
    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Invited participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Attendee>>,
    /// Google color id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<EventCreator>,
    /// Link to the event in Google Calendar.
    #[serde(default, alias = "html_link", skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    /// Event status (`confirmed`, `cancelled`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CalendarEvent {
    /// An event is all-day when its start has a date but no time.
    #[must_use]
    pub fn is_all_day(&self) -> bool {
        self.start.date.is_some() && self.start.date_time.is_none()
    }

    /// Length of the event, if both ends resolve.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        Some(self.end.instant()? - self.start.instant()?)
    }
}

/// A calendar the user can read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    /// Calendar id (`primary` for the user's main calendar).
    pub id: String,
    /// Name.
    pub summary: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Foreground color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
    /// Whether the calendar is shown by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    /// The user's access role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_role: Option<String>,
}

/// Filters for listing events. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Calendar to read.
    pub calendar_id: Option<String>,
    /// Lower bound (RFC 3339).
    pub time_min: Option<String>,
    /// Upper bound (RFC 3339).
    pub time_max: Option<String>,
    /// Page size.
    pub max_results: Option<u32>,
}

impl EventQuery {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a specific calendar.
    #[must_use]
    pub fn calendar(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = Some(id.into());
        self
    }

    /// Restrict to events inside `[min, max]`.
    #[must_use]
    pub fn between(mut self, min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        self.time_min = Some(min.to_rfc3339());
        self.time_max = Some(max.to_rfc3339());
        self
    }

    /// Limit the number of events.
    #[must_use]
    pub fn max_results(mut self, n: u32) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Query string pairs for the set filters, in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref id) = self.calendar_id {
            pairs.push(("calendar_id", id.clone()));
        }
        if let Some(ref min) = self.time_min {
            pairs.push(("time_min", min.clone()));
        }
        if let Some(ref max) = self.time_max {
            pairs.push(("time_max", max.clone()));
        }
        if let Some(n) = self.max_results {
            pairs.push(("max_results", n.to_string()));
        }
        pairs
    }
}

/// An event to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendarEvent {
    /// Title.
    pub summary: String,
    /// Description.
    pub description: Option<String>,
    /// Start.
    pub start: EventDateTime,
    /// End.
    pub end: EventDateTime,
    /// Location.
    pub location: Option<String>,
    /// Attendee emails.
    pub attendees: Vec<String>,
}

impl NewCalendarEvent {
    /// Create an event with the required fields.
    #[must_use]
    pub fn new(summary: impl Into<String>, start: EventDateTime, end: EventDateTime) -> Self {
        Self {
            summary: summary.into(),
            description: None,
            start,
            end,
            location: None,
            attendees: Vec::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the location.
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Invite an attendee.
    #[must_use]
    pub fn attendee(mut self, email: impl Into<String>) -> Self {
        self.attendees.push(email.into());
        self
    }

    /// Check the event before sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary is blank or the end precedes the start.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.summary.trim().is_empty() {
            return Err(ValidationError::EmptySummary);
        }
        if let (Some(start), Some(end)) = (self.start.instant(), self.end.instant()) {
            if end < start {
                return Err(ValidationError::InvalidTimeRange);
            }
        }
        Ok(())
    }

    /// Wire payload. Attendees become `[{"email": ..}]` and are omitted when
    /// there are none.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "summary": self.summary,
            "description": self.description,
            "start": self.start,
            "end": self.end,
            "location": self.location,
        });
        if !self.attendees.is_empty() {
            let attendees: Vec<Attendee> = self.attendees.iter().map(Attendee::new).collect();
            payload["attendees"] = serde_json::json!(attendees);
        }
        payload
    }
}

/// The Google account linked for calendar access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleCalendarUser {
    /// Google account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Whether calendar access is currently granted.
    #[serde(default)]
    pub is_connected: bool,
}
