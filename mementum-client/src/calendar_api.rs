//! Google Calendar endpoints, proxied by the backend under `/notes/calendar`.

use mementum_auth::{read_json, ApiRequest, AuthClient, ClientResult, Method};
use mementum_core::{Calendar, CalendarEvent, EventQuery, GoogleCalendarUser, NewCalendarEvent};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Calendar used when none is given.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// List endpoints answer either with a bare array or with the array wrapped
/// in an object, depending on the backend version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "calendars", alias = "events")]
        items: Vec<T>,
    },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { items } => items,
        }
    }
}

/// Client for the linked Google calendar.
#[derive(Debug, Clone)]
pub struct CalendarApi {
    client: Arc<AuthClient>,
}

impl CalendarApi {
    /// Create a client sharing `client`'s session and refresh state.
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self { client }
    }

    /// The linked Google account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn user_info(&self) -> ClientResult<GoogleCalendarUser> {
        let url = self
            .client
            .url(&self.client.config().endpoints.calendar_user_info)?;
        read_json(self.client.get(url).await?).await
    }

    /// Calendars the user can see.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn calendars(&self) -> ClientResult<Vec<Calendar>> {
        let url = self
            .client
            .url(&self.client.config().endpoints.calendar_calendars)?;
        let listing: Listing<Calendar> = read_json(self.client.get(url).await?).await?;
        Ok(listing.into_vec())
    }

    /// Events matching `query`. Unset filters are left to the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn events(&self, query: &EventQuery) -> ClientResult<Vec<CalendarEvent>> {
        let url = self
            .client
            .url(&self.client.config().endpoints.calendar_events)?;
        let request = ApiRequest::get(url).with_query(query.to_pairs());
        let listing: Listing<CalendarEvent> =
            read_json(self.client.request_with_auth(&request).await?).await?;
        Ok(listing.into_vec())
    }

    /// Create an event in `calendar_id`, or the primary calendar.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank summary or an end before the
    /// start, without contacting the backend.
    pub async fn create_event(
        &self,
        event: &NewCalendarEvent,
        calendar_id: Option<&str>,
    ) -> ClientResult<CalendarEvent> {
        event.validate()?;

        let calendar_id = calendar_id.unwrap_or(DEFAULT_CALENDAR_ID);
        let url = self
            .client
            .url(&self.client.config().endpoints.calendar_events)?;
        let request = ApiRequest::json(Method::POST, url, &event.to_payload())?
            .with_query([("calendar_id", calendar_id)]);

        debug!(calendar_id, summary = %event.summary, "Creating calendar event");
        read_json(self.client.request_with_auth(&request).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mementum_auth::{ClientConfig, ClientError};
    use mementum_core::{EventDateTime, ValidationError};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> CalendarApi {
        let config = ClientConfig::new().with_base_url(server.uri());
        CalendarApi::new(Arc::new(AuthClient::new(config).unwrap()))
    }

    fn event_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "summary": "Standup",
            "start": {"dateTime": "2024-03-04T09:00:00Z"},
            "end": {"dateTime": "2024-03-04T09:15:00Z"},
            "htmlLink": "https://calendar.google.com/event?eid=1"
        })
    }

    #[rstest]
    #[case::wrapped(json!({"calendars": [{"id": "primary", "summary": "Me"}]}))]
    #[case::bare(json!([{"id": "primary", "summary": "Me"}]))]
    #[tokio::test]
    async fn test_calendars_accepts_both_shapes(#[case] body: serde_json::Value) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes/calendar/calendars"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let calendars = api_for(&server).calendars().await.unwrap();
        assert_eq!(calendars.len(), 1);
        assert_eq!(calendars[0].id, "primary");
    }

    #[tokio::test]
    async fn test_events_sends_only_set_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes/calendar/events"))
            .and(query_param("calendar_id", "work"))
            .and(query_param("max_results", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json("e1")])))
            .expect(1)
            .mount(&server)
            .await;

        let query = EventQuery::new().calendar("work").max_results(20);
        let events = api_for(&server).events(&query).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Standup");

        let requests = server.received_requests().await.unwrap();
        let query = requests[0].url.query().unwrap_or_default();
        assert!(!query.contains("time_min"));
        assert!(!query.contains("time_max"));
    }

    #[tokio::test]
    async fn test_create_event_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notes/calendar/events"))
            .and(query_param("calendar_id", "primary"))
            .and(body_json(json!({
                "summary": "Lunch",
                "description": null,
                "start": {"dateTime": "2024-03-04T12:00:00+00:00"},
                "end": {"dateTime": "2024-03-04T13:00:00+00:00"},
                "location": "Cafe",
                "attendees": [{"email": "ada@example.com"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(event_json("e2")))
            .expect(1)
            .mount(&server)
            .await;

        let event = NewCalendarEvent::new(
            "Lunch",
            EventDateTime {
                date_time: Some("2024-03-04T12:00:00+00:00".into()),
                ..EventDateTime::default()
            },
            EventDateTime {
                date_time: Some("2024-03-04T13:00:00+00:00".into()),
                ..EventDateTime::default()
            },
        )
        .location("Cafe")
        .attendee("ada@example.com");

        let created = api_for(&server).create_event(&event, None).await.unwrap();
        assert_eq!(created.id, "e2");
    }

    #[tokio::test]
    async fn test_invalid_event_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let event = NewCalendarEvent::new(
            "  ",
            EventDateTime::on("2024-03-04"),
            EventDateTime::on("2024-03-05"),
        );
        let err = api_for(&server)
            .create_event(&event, Some("work"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::EmptySummary)
        ));
    }

    #[tokio::test]
    async fn test_user_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes/calendar/user-info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "email": "ada@gmail.com",
                "name": "Ada",
                "is_connected": true
            })))
            .mount(&server)
            .await;

        let user = api_for(&server).user_info().await.unwrap();
        assert!(user.is_connected);
        assert_eq!(user.name, "Ada");
    }
}
