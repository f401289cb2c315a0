//! # mementum-auth
//!
//! Cookie-session HTTP transport for the mementum backend.
//!
//! The backend authenticates with an HTTP-only session cookie. When the
//! cookie expires a request fails with 401; this crate renews the session
//! through the refresh endpoint and replays the request once, with a single
//! refresh shared by every request that failed at the same time.
//!
//! ## Core Concepts
//!
//! - **[`AuthClient`]**: HTTP client with coordinated refresh-and-retry
//! - **[`RefreshCoordinator`]**: Runs at most one refresh at a time
//! - **[`ApiRequest`]**: Replayable request description
//! - **[`ClientConfig`]**: Base URLs, timeout and endpoint paths
//!
//! ## Example
//!
//! ```ignore
//! use mementum_auth::{AuthClient, ClientConfig};
//!
//! let client = AuthClient::builder(ClientConfig::from_env()?)
//!     .on_unauthenticated(|outcome| eprintln!("signed out: {outcome}"))
//!     .build()?;
//!
//! let response = client.get(client.url("/notes/")?).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod refresh;
pub mod request;
pub mod transport;

// Re-exports
pub use config::{ClientConfig, Endpoints, DEFAULT_API_URL, DEFAULT_WEB_APP_URL};
pub use error::{ClientError, ClientResult};
pub use refresh::{RefreshCoordinator, RefreshOutcome, RefreshState};
pub use request::ApiRequest;
pub use reqwest::{Method, Response, StatusCode};
pub use transport::{expect_success, read_json, AuthClient, AuthClientBuilder, UnauthenticatedHook};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ApiRequest, AuthClient, ClientConfig, ClientError, ClientResult, RefreshOutcome,
    };
}
