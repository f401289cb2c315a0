//! Notes endpoints.

use mementum_auth::{expect_success, read_json, AuthClient, ClientError, ClientResult};
use mementum_core::{
    AgentRequest, AgentResponse, AnalyzeAllReport, CalendarAnalysis, CategoryCount,
    CategoryList, CategoryNotes, Note, NoteCalendarEvents, NoteCount, NoteDraft, NoteId,
    NoteGroups, NoteUpdate, ValidationError,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Client for notes and the AI agent.
#[derive(Debug, Clone)]
pub struct NotesApi {
    client: Arc<AuthClient>,
}

impl NotesApi {
    /// Create a client sharing `client`'s session and refresh state.
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self { client }
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        self.client.url(path)
    }

    /// All notes of the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn list(&self) -> ClientResult<Vec<Note>> {
        let url = self.url(&self.client.config().endpoints.notes)?;
        read_json(self.client.get(url).await?).await
    }

    /// Most recently created notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn recent(&self) -> ClientResult<Vec<Note>> {
        let url = self.url(&self.client.config().endpoints.notes_recent)?;
        read_json(self.client.get(url).await?).await
    }

    /// One note.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] with 404 if the note does not exist.
    pub async fn get(&self, id: NoteId) -> ClientResult<Note> {
        let url = self.url(&self.client.config().endpoints.note(id))?;
        read_json(self.client.get(url).await?).await
    }

    /// Store a note as typed, without AI processing.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is blank or the request fails.
    pub async fn create(&self, draft: &NoteDraft) -> ClientResult<Note> {
        if draft.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent.into());
        }
        let url = self.url(&self.client.config().endpoints.notes)?;
        read_json(self.client.post_json(url, draft).await?).await
    }

    /// Let the AI agent title, categorise and store `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is blank or the request fails.
    pub async fn create_with_ai(&self, content: &str) -> ClientResult<AgentResponse> {
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyContent.into());
        }
        let url = self.url(&self.client.config().endpoints.agent_process)?;
        let response: AgentResponse = read_json(
            self.client
                .post_json(url, &AgentRequest::new(content))
                .await?,
        )
        .await?;
        debug!(note_id = ?response.created_note_id(), "Agent created note");
        Ok(response)
    }

    /// Change a note's title or content.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn update(&self, id: NoteId, update: &NoteUpdate) -> ClientResult<Note> {
        let url = self.url(&self.client.config().endpoints.note(id))?;
        read_json(self.client.put_json(url, update).await?).await
    }

    /// Delete a note.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call.
    pub async fn delete(&self, id: NoteId) -> ClientResult<()> {
        let url = self.url(&self.client.config().endpoints.note(id))?;
        expect_success(self.client.delete(url).await?).await?;
        Ok(())
    }

    /// Number of notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn count(&self) -> ClientResult<u64> {
        let url = self.url(&self.client.config().endpoints.notes_count)?;
        let count: NoteCount = read_json(self.client.get(url).await?).await?;
        Ok(count.count)
    }

    /// Categories with their note counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn categories(&self) -> ClientResult<Vec<CategoryCount>> {
        let url = self.url(&self.client.config().endpoints.notes_categories)?;
        let list: CategoryList = read_json(self.client.get(url).await?).await?;
        Ok(list.categories)
    }

    /// Every note, grouped by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn grouped(&self) -> ClientResult<BTreeMap<String, Vec<Note>>> {
        let url = self.url(&self.client.config().endpoints.notes_categories_grouped)?;
        let groups: NoteGroups = read_json(self.client.get(url).await?).await?;
        debug!(categories = groups.groups.len(), "Fetched grouped notes");
        Ok(groups.groups)
    }

    /// Notes in one category. The name is percent-encoded into the path.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn by_category(&self, category: &str) -> ClientResult<CategoryNotes> {
        let mut url = self.url(&self.client.config().endpoints.notes_by_category)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Configuration("base URL cannot take a path".into()))?
            .pop_if_empty()
            .push(category);
        read_json(self.client.get(url).await?).await
    }

    /// Re-run AI analysis over every note.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn analyze_all(&self) -> ClientResult<AnalyzeAllReport> {
        let url = self.url(&self.client.config().endpoints.notes_analyze_all)?;
        read_json(self.client.post(url).await?).await
    }

    /// Calendar events created from a note.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn calendar_events(&self, id: NoteId) -> ClientResult<NoteCalendarEvents> {
        let url = self.url(&self.client.config().endpoints.note_calendar_events(id))?;
        read_json(self.client.get(url).await?).await
    }

    /// Look for dates in a note and create calendar events for them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn analyze_for_calendar(&self, id: NoteId) -> ClientResult<CalendarAnalysis> {
        let url = self.url(&self.client.config().endpoints.note_analyze_calendar(id))?;
        read_json(self.client.post(url).await?).await
    }
}
