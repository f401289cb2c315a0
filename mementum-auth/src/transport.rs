//! Session-aware HTTP client.
//!
//! [`AuthClient`] sends requests with the session cookie attached and
//! recovers from one kind of failure on its own: a 401 caused by an expired
//! session. It renews the session once through the [`RefreshCoordinator`]
//! and replays the original request exactly once. Every other outcome is
//! passed through to the caller unchanged.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::refresh::{RefreshCoordinator, RefreshOutcome, RefreshState};
use crate::request::ApiRequest;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Callback run once per failed refresh, e.g. to route the user to sign-in.
pub type UnauthenticatedHook = Arc<dyn Fn(&RefreshOutcome) + Send + Sync>;

/// HTTP client with coordinated session refresh.
///
/// Clones share the same refresh coordinator, so one logical client
/// never runs two refreshes at once no matter how many handles exist.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    config: Arc<ClientConfig>,
    refresh_url: Url,
    refresh: RefreshCoordinator,
    on_unauthenticated: Option<UnauthenticatedHook>,
}

impl fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.config.base_url)
            .field("refresh", &self.refresh)
            .field("on_unauthenticated", &self.on_unauthenticated.is_some())
            .finish()
    }
}

impl AuthClient {
    /// Create a client with a default HTTP client and no hook.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        AuthClientBuilder::new(config).build()
    }

    /// Start building a client.
    pub fn builder(config: ClientConfig) -> AuthClientBuilder {
        AuthClientBuilder::new(config)
    }

    /// The configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute backend URL for a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn url(&self, path: &str) -> ClientResult<Url> {
        self.config.url(path)
    }

    /// Whether a refresh is running.
    pub fn refresh_state(&self) -> RefreshState {
        self.refresh.state()
    }

    /// Send a request, renewing the session once if it is rejected with 401.
    ///
    /// - Any status other than 401 is returned as is, after one network call.
    /// - On 401 the session is refreshed (joining a refresh already in
    ///   flight) and, if renewed, the request is sent once more. The second
    ///   response is returned whatever its status.
    /// - If the refresh fails, every caller waiting on it gets
    ///   [`ClientError::Unauthenticated`] and the original request is not
    ///   replayed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if either send gets no response and
    /// [`ClientError::Unauthenticated`] if the session could not be renewed.
    pub async fn request_with_auth(&self, request: &ApiRequest) -> ClientResult<Response> {
        debug!(method = %request.method(), url = %request.url(), "Sending request");

        let response = self.send(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(url = %request.url(), "Request rejected with 401, refreshing session");
        let outcome = self.refresh_session().await;
        if !outcome.is_renewed() {
            warn!(url = %request.url(), outcome = %outcome, "Session could not be renewed");
            return Err(ClientError::Unauthenticated { outcome });
        }

        debug!(method = %request.method(), url = %request.url(), "Replaying request");
        Ok(self.send(request).await?)
    }

    /// Send a request that does not need a session, such as sign-in.
    ///
    /// A 401 here means the credentials were wrong, so it is returned like
    /// any other status: no refresh, no replay, no hook.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if no response arrives.
    pub async fn request_without_auth(&self, request: &ApiRequest) -> ClientResult<Response> {
        debug!(method = %request.method(), url = %request.url(), "Sending request without session");
        Ok(self.send(request).await?)
    }

    /// Ask the backend to renew the session cookie.
    ///
    /// Joins the in-flight refresh if there is one. A failed refresh runs
    /// the unauthenticated hook exactly once, however many callers wait on
    /// it.
    pub async fn refresh_session(&self) -> RefreshOutcome {
        let http = self.http.clone();
        let url = self.refresh_url.clone();
        let hook = self.on_unauthenticated.clone();

        self.refresh
            .run(move || async move {
                let outcome = match http.post(url).send().await {
                    Ok(response) if response.status().is_success() => RefreshOutcome::Renewed,
                    Ok(response) => RefreshOutcome::Rejected {
                        status: response.status().as_u16(),
                    },
                    Err(err) => RefreshOutcome::Unreachable {
                        reason: err.to_string(),
                    },
                };

                if outcome.is_renewed() {
                    info!("Session renewed");
                } else {
                    warn!(outcome = %outcome, "Session refresh failed");
                    if let Some(hook) = hook {
                        hook(&outcome);
                    }
                }
                outcome
            })
            .await
    }

    /// GET with session refresh.
    ///
    /// # Errors
    ///
    /// See [`AuthClient::request_with_auth`].
    pub async fn get(&self, url: Url) -> ClientResult<Response> {
        self.request_with_auth(&ApiRequest::get(url)).await
    }

    /// POST without a body, with session refresh.
    ///
    /// # Errors
    ///
    /// See [`AuthClient::request_with_auth`].
    pub async fn post(&self, url: Url) -> ClientResult<Response> {
        self.request_with_auth(&ApiRequest::post(url)).await
    }

    /// POST a JSON body, with session refresh.
    ///
    /// # Errors
    ///
    /// Also returns [`ClientError::Decode`] if the body cannot be serialised.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> ClientResult<Response> {
        let request = ApiRequest::json(Method::POST, url, body)?;
        self.request_with_auth(&request).await
    }

    /// PUT a JSON body, with session refresh.
    ///
    /// # Errors
    ///
    /// Also returns [`ClientError::Decode`] if the body cannot be serialised.
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> ClientResult<Response> {
        let request = ApiRequest::json(Method::PUT, url, body)?;
        self.request_with_auth(&request).await
    }

    /// DELETE with session refresh.
    ///
    /// # Errors
    ///
    /// See [`AuthClient::request_with_auth`].
    pub async fn delete(&self, url: Url) -> ClientResult<Response> {
        self.request_with_auth(&ApiRequest::delete(url)).await
    }

    async fn send(&self, request: &ApiRequest) -> reqwest::Result<Response> {
        request.to_builder(&self.http).send().await
    }
}

/// Turn a non-success response into [`ClientError::Status`].
///
/// # Errors
///
/// Returns an error carrying the status and body text for non-2xx responses.
pub async fn expect_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %body, "Backend returned error status");
    Err(ClientError::status(status.as_u16(), body))
}

/// Check the status and decode a JSON body.
///
/// # Errors
///
/// Returns [`ClientError::Status`] for non-2xx responses and
/// [`ClientError::Decode`] if the body does not match `T`.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = expect_success(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Builder for [`AuthClient`].
pub struct AuthClientBuilder {
    config: ClientConfig,
    http: Option<Client>,
    on_unauthenticated: Option<UnauthenticatedHook>,
}

impl AuthClientBuilder {
    /// Create a builder.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: None,
            on_unauthenticated: None,
        }
    }

    /// Use a preconfigured HTTP client. It should have a cookie store
    /// enabled, or the renewed session cookie will not be sent.
    #[must_use]
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Run `hook` once for every refresh that fails.
    #[must_use]
    pub fn on_unauthenticated<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RefreshOutcome) + Send + Sync + 'static,
    {
        self.on_unauthenticated = Some(Arc::new(hook));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh URL is invalid or the HTTP client
    /// cannot be built.
    pub fn build(self) -> ClientResult<AuthClient> {
        let refresh_url = self.config.url(&self.config.endpoints.refresh)?;
        let http = match self.http {
            Some(client) => client,
            None => self.config.build_http_client()?,
        };

        Ok(AuthClient {
            http,
            config: Arc::new(self.config),
            refresh_url,
            refresh: RefreshCoordinator::new(),
            on_unauthenticated: self.on_unauthenticated,
        })
    }
}
