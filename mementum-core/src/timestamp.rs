//! Lenient timestamp parsing.
//!
//! The backend serialises some datetimes with an offset (`2024-05-01T10:00:00Z`)
//! and some without (`2024-05-01T10:00:00.123456`). Offset-less values are UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a backend timestamp.
///
/// Accepts RFC 3339, naive ISO 8601 datetimes (treated as UTC) and bare
/// dates (midnight UTC). Returns `None` for anything else.
///
/// # Example
///
/// ```rust
/// use mementum_core::timestamp::parse_lenient;
///
/// assert!(parse_lenient("2024-05-01T10:00:00Z").is_some());
/// assert!(parse_lenient("2024-05-01T10:00:00.5").is_some());
/// assert!(parse_lenient("2024-05-01").is_some());
/// assert!(parse_lenient("tomorrow").is_none());
/// ```
#[must_use]
pub fn parse_lenient(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde adapter for `Option<DateTime<Utc>>` fields using [`parse_lenient`].
///
/// Missing, null or unparseable values deserialize to `None`.
pub mod option {
    use super::parse_lenient;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as RFC 3339.
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize leniently.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_lenient))
    }
}
