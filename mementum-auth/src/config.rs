//! Client configuration and the backend endpoint map.

use crate::error::{ClientError, ClientResult};
use mementum_core::NoteId;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default backend address for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default web app address for local development.
pub const DEFAULT_WEB_APP_URL: &str = "http://localhost:5173";

/// Paths of the backend operations the client uses.
///
/// Paths are relative to [`ClientConfig::base_url`]. Per-note paths take the
/// note id through the helper methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Account registration (POST, JSON).
    pub register: String,
    /// Password sign-in (POST, form-encoded).
    pub login: String,
    /// Session refresh (POST).
    pub refresh: String,
    /// Logout (POST).
    pub logout: String,
    /// Session status (GET).
    pub status: String,
    /// Google sign-in entry point (browser navigation).
    pub google_sign_in: String,
    /// Unlink Google account (DELETE).
    pub google_disconnect: String,
    /// Notes collection.
    pub notes: String,
    /// Recently created notes.
    pub notes_recent: String,
    /// Note count.
    pub notes_count: String,
    /// Category counts.
    pub notes_categories: String,
    /// Notes grouped by category.
    pub notes_categories_grouped: String,
    /// Notes of one category (prefix; category appended).
    pub notes_by_category: String,
    /// Re-analyse every note.
    pub notes_analyze_all: String,
    /// AI agent note creation.
    pub agent_process: String,
    /// Linked Google account.
    pub calendar_user_info: String,
    /// Calendars.
    pub calendar_calendars: String,
    /// Calendar events.
    pub calendar_events: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            register: "/auth/register".into(),
            login: "/auth/token".into(),
            refresh: "/auth/refresh".into(),
            logout: "/auth/logout".into(),
            status: "/auth/status".into(),
            google_sign_in: "/auth/google".into(),
            google_disconnect: "/auth/google/disconnect".into(),
            notes: "/notes/".into(),
            notes_recent: "/notes/recent".into(),
            notes_count: "/notes/count".into(),
            notes_categories: "/notes/categories".into(),
            notes_categories_grouped: "/notes/categories/grouped".into(),
            notes_by_category: "/notes/by-category/".into(),
            notes_analyze_all: "/notes/analyze-all".into(),
            agent_process: "/ai-agent/process".into(),
            calendar_user_info: "/notes/calendar/user-info".into(),
            calendar_calendars: "/notes/calendar/calendars".into(),
            calendar_events: "/notes/calendar/events".into(),
        }
    }
}

impl Endpoints {
    /// Path of a single note.
    pub fn note(&self, id: NoteId) -> String {
        format!("{}{}", self.notes, id)
    }

    /// Calendar events derived from a note.
    pub fn note_calendar_events(&self, id: NoteId) -> String {
        format!("{}{}/calendar-events", self.notes, id)
    }

    /// Re-analyse a note for calendar events.
    pub fn note_analyze_calendar(&self, id: NoteId) -> String {
        format!("{}{}/analyze-calendar", self.notes, id)
    }
}

/// Configuration for a mementum client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash.
    pub base_url: String,
    /// Web app base URL, for links handed to the user.
    pub web_app_url: String,
    /// Per-request timeout. None leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Endpoint paths.
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            web_app_url: DEFAULT_WEB_APP_URL.to_string(),
            timeout: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at the local development backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the web app base URL.
    #[must_use]
    pub fn with_web_app_url(mut self, url: impl Into<String>) -> Self {
        self.web_app_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the endpoint map.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Load from environment variables.
    ///
    /// Looks for:
    /// - `MEMENTUM_API_URL`
    /// - `MEMENTUM_WEB_APP_URL`
    /// - `MEMENTUM_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns an error if `MEMENTUM_TIMEOUT_SECS` is set but not a number.
    pub fn from_env() -> ClientResult<Self> {
        let mut config = Self::new();
        if let Ok(url) = std::env::var("MEMENTUM_API_URL") {
            config = config.with_base_url(url);
        }
        if let Ok(url) = std::env::var("MEMENTUM_WEB_APP_URL") {
            config = config.with_web_app_url(url);
        }
        if let Ok(secs) = std::env::var("MEMENTUM_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Configuration(format!("MEMENTUM_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Absolute backend URL for a path.
    ///
    /// The path is appended to the base verbatim, so a base with a path
    /// prefix (`https://host/api`) keeps it.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is not an absolute URL.
    pub fn url(&self, path: &str) -> ClientResult<Url> {
        join(&self.base_url, path)
    }

    /// Absolute web app URL for a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is not an absolute URL.
    pub fn web_url(&self, path: &str) -> ClientResult<Url> {
        join(&self.web_app_url, path)
    }

    /// Build an HTTP client for this config.
    ///
    /// The client keeps a cookie store so the session cookie set by the
    /// backend is attached to every later request.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn build_http_client(&self) -> ClientResult<Client> {
        let mut builder = Client::builder().cookie_store(true);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }
}

fn join(base: &str, path: &str) -> ClientResult<Url> {
    let raw = if path.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), path)
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path)
    };
    Url::parse(&raw).map_err(|source| ClientError::InvalidUrl { url: raw, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, None);
        assert_eq!(config.endpoints.refresh, "/auth/refresh");
        assert_eq!(config.endpoints.login, "/auth/token");
    }

    #[rstest]
    #[case("http://localhost:8000", "/auth/status", "http://localhost:8000/auth/status")]
    #[case("http://localhost:8000/", "/notes/", "http://localhost:8000/notes/")]
    #[case("https://host.example/api", "/notes/count", "https://host.example/api/notes/count")]
    #[case("https://host.example/api/", "notes/count", "https://host.example/api/notes/count")]
    fn test_url_join(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        let config = ClientConfig::new().with_base_url(base);
        assert_eq!(config.url(path).unwrap().as_str(), expected);
    }

    #[test]
    fn test_relative_base_rejected() {
        let config = ClientConfig::new().with_base_url("localhost-without-scheme");
        let err = config.url("/notes/").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn test_note_paths() {
        let endpoints = Endpoints::default();
        let id = NoteId::new(42);
        assert_eq!(endpoints.note(id), "/notes/42");
        assert_eq!(endpoints.note_calendar_events(id), "/notes/42/calendar-events");
        assert_eq!(endpoints.note_analyze_calendar(id), "/notes/42/analyze-calendar");
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("MEMENTUM_API_URL", "https://api.mementum.test/");
        std::env::set_var("MEMENTUM_TIMEOUT_SECS", "15");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://api.mementum.test");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));

        std::env::set_var("MEMENTUM_TIMEOUT_SECS", "soon");
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ClientError::Configuration(_))
        ));

        std::env::remove_var("MEMENTUM_API_URL");
        std::env::remove_var("MEMENTUM_TIMEOUT_SECS");
    }

    #[test]
    fn test_build_client() {
        let config = ClientConfig::new().with_timeout(Duration::from_secs(10));
        assert!(config.build_http_client().is_ok());
    }
}
