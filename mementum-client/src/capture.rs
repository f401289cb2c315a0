//! Quick capture of text selected on a web page.
//!
//! The browser extension's only job: turn a selection into note text, send
//! it to the AI agent with background analysis enabled, and link back to the
//! web app. It goes through the same [`AuthClient`] as everything else, so an
//! expired session is renewed here too.

use mementum_auth::{read_json, AuthClient, ClientResult};
use mementum_core::{AgentRequest, AgentResponse, NoteId, ValidationError};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Longest note the capture form accepts, in characters.
pub const MAX_CAPTURE_CHARS: usize = 1000;

/// How close a draft is to [`MAX_CAPTURE_CHARS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharUsage {
    /// Up to 70% of the limit.
    Normal,
    /// Over 70% of the limit.
    Warning,
    /// Over 90% of the limit.
    Critical,
}

impl CharUsage {
    /// Usage level for a draft of `len` characters.
    pub fn for_len(len: usize) -> Self {
        if len > MAX_CAPTURE_CHARS * 9 / 10 {
            Self::Critical
        } else if len > MAX_CAPTURE_CHARS * 7 / 10 {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// Build the initial note text for a selection.
///
/// A source footer naming the page is appended when the title or URL is
/// known. An empty selection yields an empty draft.
pub fn compose(selection: &str, page_title: Option<&str>, page_url: Option<&str>) -> String {
    if selection.is_empty() {
        return String::new();
    }

    let title = page_title.filter(|t| !t.is_empty());
    let url = page_url.filter(|u| !u.is_empty());
    if title.is_none() && url.is_none() {
        return selection.to_string();
    }

    format!(
        "{}\n\nSource: {}\n{}",
        selection,
        title.unwrap_or("Untitled"),
        url.unwrap_or_default()
    )
}

/// Check a draft and return the text that would be sent.
///
/// # Errors
///
/// Returns an error if the trimmed text is empty or longer than
/// [`MAX_CAPTURE_CHARS`].
pub fn prepare(content: &str) -> Result<&str, ValidationError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    let len = content.chars().count();
    if len > MAX_CAPTURE_CHARS {
        return Err(ValidationError::ContentTooLong {
            len,
            max: MAX_CAPTURE_CHARS,
        });
    }
    Ok(content)
}

/// Sends captured text to the AI agent.
#[derive(Debug, Clone)]
pub struct QuickCapture {
    client: Arc<AuthClient>,
}

impl QuickCapture {
    /// Create a capture client sharing `client`'s session and refresh state.
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self { client }
    }

    /// Save `content` as a note.
    ///
    /// Returns the id of the created note when the backend reports one.
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the backend if the text
    /// is empty or too long, and a client error if the request fails.
    pub async fn save(&self, content: &str) -> ClientResult<Option<NoteId>> {
        let message = prepare(content)?;
        let url = self
            .client
            .url(&self.client.config().endpoints.agent_process)?;
        let request = AgentRequest::new(message).with_background_tasks();

        debug!(chars = message.chars().count(), "Saving captured note");
        let response: AgentResponse = read_json(self.client.post_json(url, &request).await?).await?;

        let note_id = response.created_note_id();
        info!(note_id = ?note_id, "Captured note saved");
        Ok(note_id)
    }

    /// Link to the notes page of the web app.
    ///
    /// # Errors
    ///
    /// Returns an error if the web app URL is invalid.
    pub fn notes_page_url(&self) -> ClientResult<Url> {
        self.client.config().web_url("/notes")
    }
}
