//! Session status and account endpoints.

use async_trait::async_trait;
use mementum_auth::{expect_success, read_json, ApiRequest, AuthClient, ClientResult, Method};
use mementum_core::{AuthStatus, Registration};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Reads and ends the current session.
///
/// This is the seam between [`SessionStore`](crate::SessionStore) and the
/// network, so the store can be driven by a fake in tests.
#[async_trait]
pub trait SessionProbe: Send + Sync {
    /// Current user, or an error if there is no valid session.
    async fn status(&self) -> ClientResult<AuthStatus>;

    /// End the session on the server.
    async fn logout(&self) -> ClientResult<()>;
}

/// Client for the `/auth` endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: Arc<AuthClient>,
}

impl AuthApi {
    /// Create a client sharing `client`'s session and refresh state.
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self { client }
    }

    /// Create a password account. The user signs in separately.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`](mementum_auth::ClientError::Status)
    /// with the backend's reason if the name or email is taken.
    pub async fn register(&self, registration: &Registration) -> ClientResult<()> {
        let url = self.client.url(&self.client.config().endpoints.register)?;
        let request = ApiRequest::json(Method::POST, url, registration)?;
        expect_success(self.client.request_without_auth(&request).await?).await?;
        info!(username = %registration.username, "Account registered");
        Ok(())
    }

    /// Sign in with a password.
    ///
    /// The backend answers with the session cookie, which the shared cookie
    /// store attaches to every later request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`](mementum_auth::ClientError::Status)
    /// with 401 for wrong credentials. No refresh is attempted.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        let url = self.client.url(&self.client.config().endpoints.login)?;
        let request = ApiRequest::form(
            Method::POST,
            url,
            [("username", username), ("password", password)],
        );
        debug!(username, "Signing in");
        expect_success(self.client.request_without_auth(&request).await?).await?;
        info!(username, "Signed in");
        Ok(())
    }

    /// Current user and linked-account details.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthenticated`](mementum_auth::ClientError::Unauthenticated)
    /// when there is no session to renew.
    pub async fn status(&self) -> ClientResult<AuthStatus> {
        let url = self.client.url(&self.client.config().endpoints.status)?;
        read_json(self.client.get(url).await?).await
    }

    /// End the session. The server clears the cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call.
    pub async fn logout(&self) -> ClientResult<()> {
        let url = self.client.url(&self.client.config().endpoints.logout)?;
        expect_success(self.client.post(url).await?).await?;
        Ok(())
    }

    /// Unlink the Google account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call.
    pub async fn disconnect_google(&self) -> ClientResult<()> {
        let url = self
            .client
            .url(&self.client.config().endpoints.google_disconnect)?;
        expect_success(self.client.delete(url).await?).await?;
        Ok(())
    }

    /// Where to send the browser to start Google sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn google_sign_in_url(&self) -> ClientResult<Url> {
        self.client.url(&self.client.config().endpoints.google_sign_in)
    }
}

#[async_trait]
impl SessionProbe for AuthApi {
    async fn status(&self) -> ClientResult<AuthStatus> {
        AuthApi::status(self).await
    }

    async fn logout(&self) -> ClientResult<()> {
        AuthApi::logout(self).await
    }
}
