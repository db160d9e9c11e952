//! Factories for resilient FOLIO clients.
//!
//! A [`ClientFactory`] logs in once and then hands out any number of
//! [`FolioClient`]s that share the login, each with its own retry count and
//! timeout.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use folio_client::{default_client_factory, ClientOptions, FolioParams};
//!
//! let params = FolioParams::new(
//!     "https://folio-snapshot-okapi.dev.folio.org/",
//!     "diku",
//!     "diku_admin",
//!     "admin",
//! )?;
//!
//! let factory = default_client_factory(params).await?;
//!
//! let client = factory.create(None)?;
//! let patient = factory.create(Some(ClientOptions {
//!     retries: 10,
//!     timeout: Duration::from_secs(60),
//! }))?;
//! ```

use std::time::Duration;

use tracing::debug;

use crate::auth::{AuthError, RefreshTokenAuth};
use crate::clients::{
    FolioClient, HttpError, RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_RETRIES,
};
use crate::config::FolioParams;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-client settings for [`ClientFactory::create`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    /// Retries after the first attempt for transient failures.
    pub retries: u32,
    /// Timeout for each attempt.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Creates [`FolioClient`]s that share one authentication.
#[derive(Clone, Debug)]
pub struct ClientFactory {
    auth: RefreshTokenAuth,
}

// Verify ClientFactory is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientFactory>();
};

impl ClientFactory {
    /// Creates a factory around an existing authentication.
    #[must_use]
    pub const fn new(auth: RefreshTokenAuth) -> Self {
        Self { auth }
    }

    /// Returns the parameters the factory authenticates with.
    #[must_use]
    pub fn params(&self) -> &FolioParams {
        self.auth.params()
    }

    /// Returns the authentication shared by every client of this factory.
    #[must_use]
    pub const fn auth(&self) -> &RefreshTokenAuth {
        &self.auth
    }

    /// Creates a client. `None` uses [`ClientOptions::default`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn create(&self, options: Option<ClientOptions>) -> Result<FolioClient, HttpError> {
        let options = options.unwrap_or_default();
        let params = self.params();
        debug!(
            base_url = %params.base_url(),
            retries = options.retries,
            timeout = ?options.timeout,
            "Creating FOLIO client"
        );

        FolioClient::new(
            params.base_url().clone(),
            params.auth_tenant(),
            Some(self.auth.clone()),
            RetryPolicy::new(options.retries).with_backoff_factor(DEFAULT_BACKOFF_FACTOR),
            options.timeout,
        )
    }
}

/// Logs in with `params` and returns a factory for resilient clients.
///
/// The login happens here, so bad credentials fail fast instead of on the
/// first request.
///
/// # Errors
///
/// Returns [`AuthError`] if the login fails.
pub async fn default_client_factory(params: FolioParams) -> Result<ClientFactory, AuthError> {
    let auth = RefreshTokenAuth::new(params).await?;
    Ok(ClientFactory::new(auth))
}
