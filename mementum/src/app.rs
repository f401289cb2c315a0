//! One handle wiring the transport, the typed clients and the session store.

use mementum_auth::{AuthClient, ClientConfig, ClientResult, RefreshOutcome};
use mementum_client::{AuthApi, CalendarApi, NotesApi, QuickCapture, SessionState, SessionStore};
use std::sync::Arc;
use tracing::info;

type SignedOutHook = Arc<dyn Fn(&RefreshOutcome) + Send + Sync>;

/// Everything an application needs to talk to the mementum backend.
///
/// All clients share one [`AuthClient`], so they share its cookie jar and
/// its refresh coordination. When a refresh fails the session store is set
/// to [`SessionState::Anonymous`] and the optional signed-out hook runs,
/// once per failed refresh.
#[derive(Clone)]
pub struct Mementum {
    client: Arc<AuthClient>,
    session: Arc<SessionStore>,
    auth: AuthApi,
    notes: NotesApi,
    calendar: CalendarApi,
    capture: QuickCapture,
}

impl std::fmt::Debug for Mementum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mementum")
            .field("client", &self.client)
            .field("session", &self.session.current())
            .finish()
    }
}

impl Mementum {
    /// Connect with `config` and no signed-out hook.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URLs are invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::builder(config).build()
    }

    /// Connect with configuration read from the environment.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`] and [`Mementum::new`].
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Start building a handle.
    pub fn builder(config: ClientConfig) -> MementumBuilder {
        MementumBuilder::new(config)
    }

    /// The shared transport.
    pub fn client(&self) -> &Arc<AuthClient> {
        &self.client
    }

    /// Session status and account endpoints.
    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    /// Notes endpoints.
    pub fn notes(&self) -> &NotesApi {
        &self.notes
    }

    /// Calendar endpoints.
    pub fn calendar(&self) -> &CalendarApi {
        &self.calendar
    }

    /// Quick capture.
    pub fn capture(&self) -> &QuickCapture {
        &self.capture
    }

    /// Session state.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Ask the backend who is signed in and update the session store.
    pub async fn check_auth(&self) -> SessionState {
        self.session.check_auth(&self.auth).await
    }

    /// Sign in with a password, then load the user into the session store.
    ///
    /// # Errors
    ///
    /// Returns the sign-in error; the session store is left unchanged.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<SessionState> {
        self.auth.login(username, password).await?;
        Ok(self.check_auth().await)
    }

    /// Sign out on the backend and clear the session store.
    pub async fn logout(&self) {
        self.session.logout(&self.auth).await;
    }
}

/// Builder for [`Mementum`].
pub struct MementumBuilder {
    config: ClientConfig,
    on_signed_out: Option<SignedOutHook>,
}

impl MementumBuilder {
    /// Create a builder.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            on_signed_out: None,
        }
    }

    /// Run `hook` after the session store is cleared because a refresh
    /// failed, typically to show the sign-in page.
    #[must_use]
    pub fn on_signed_out<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RefreshOutcome) + Send + Sync + 'static,
    {
        self.on_signed_out = Some(Arc::new(hook));
        self
    }

    /// Build the handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URLs are invalid or the HTTP client
    /// cannot be built.
    pub fn build(self) -> ClientResult<Mementum> {
        let session = Arc::new(SessionStore::new());

        let store = Arc::clone(&session);
        let on_signed_out = self.on_signed_out;
        let client = Arc::new(
            AuthClient::builder(self.config)
                .on_unauthenticated(move |outcome| {
                    store.expire();
                    if let Some(ref hook) = on_signed_out {
                        hook(outcome);
                    }
                })
                .build()?,
        );

        info!(base_url = %client.config().base_url, "Mementum client ready");

        Ok(Mementum {
            auth: AuthApi::new(Arc::clone(&client)),
            notes: NotesApi::new(Arc::clone(&client)),
            calendar: CalendarApi::new(Arc::clone(&client)),
            capture: QuickCapture::new(Arc::clone(&client)),
            client,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use mementum_core::{NoteId, UserId};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_status(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": 9, "email": "lin@example.com", "username": "lin"}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_check_auth_and_logout() {
        let server = MockServer::start().await;
        mount_status(&server).await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let app = Mementum::new(ClientConfig::new().with_base_url(server.uri())).unwrap();
        assert_eq!(app.session().current(), SessionState::Loading);

        let state = app.check_auth().await;
        assert_eq!(state.user().map(|u| u.id), Some(UserId::new(9)));
        assert_eq!(app.session().redirect_for("/login"), Some("/notes"));

        app.logout().await;
        assert_eq!(app.session().current(), SessionState::Anonymous);
        assert_eq!(app.session().redirect_for("/notes/1"), Some("/"));
    }

    #[tokio::test]
    async fn test_login_then_session_is_authenticated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "access_token=t1; Path=/"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .and(header("cookie", "access_token=t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": 9, "email": "lin@example.com", "username": "lin"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let app = Mementum::new(ClientConfig::new().with_base_url(server.uri())).unwrap();
        let state = app.login("lin", "pw").await.unwrap();

        assert!(state.is_authenticated());
        assert_eq!(app.session().user().map(|u| u.id), Some(UserId::new(9)));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_alone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let app = Mementum::new(ClientConfig::new().with_base_url(server.uri())).unwrap();
        let err = app.login("lin", "nope").await.unwrap_err();

        assert_eq!(err.status_code(), Some(401));
        assert_eq!(app.session().current(), SessionState::Loading);
    }

    #[tokio::test]
    async fn test_failed_refresh_signs_out_once() {
        let server = MockServer::start().await;
        mount_status(&server).await;
        Mock::given(method("GET"))
            .and(path("/notes/count"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(100)))
            .expect(1)
            .mount(&server)
            .await;

        let signed_out = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&signed_out);
        let app = Mementum::builder(ClientConfig::new().with_base_url(server.uri()))
            .on_signed_out(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();
        app.check_auth().await;
        assert!(app.session().current().is_authenticated());

        let results = join_all((0..3).map(|_| app.notes().count())).await;

        assert!(results.iter().all(|r| matches!(r, Err(e) if e.is_unauthenticated())));
        assert_eq!(signed_out.load(Ordering::SeqCst), 1);
        assert_eq!(app.session().current(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_clients_share_refresh() {
        let server = MockServer::start().await;
        for route in ["/notes/count", "/notes/calendar/calendars"] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(401))
                .up_to_n_times(1)
                .with_priority(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/notes/count"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 2})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/notes/calendar/calendars"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"calendars": []})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/ai-agent/process"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"note_id": 3})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
            .expect(1)
            .mount(&server)
            .await;

        let app = Mementum::new(ClientConfig::new().with_base_url(server.uri())).unwrap();
        let (count, calendars, captured) = tokio::join!(
            app.notes().count(),
            app.calendar().calendars(),
            app.capture().save("from the web")
        );

        assert_eq!(count.unwrap(), 2);
        assert!(calendars.unwrap().is_empty());
        assert_eq!(captured.unwrap(), Some(NoteId::new(3)));
    }
}
