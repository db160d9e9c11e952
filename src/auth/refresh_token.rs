//! Refresh Token Auth for FOLIO.
//!
//! [`RefreshTokenAuth`] logs in with FOLIO's expiring-token flow and hands out
//! access tokens to clients. It refreshes the token pair shortly before the
//! access token expires and logs in again when the refresh token is no longer
//! usable or the server rejects a token.
//!
//! # Flow
//!
//! 1. `POST /authn/login-with-expiry` with the username and password
//! 2. Requests carry `x-okapi-token: <access token>`
//! 3. Near expiry, `POST /authn/refresh` with the refresh token cookie
//! 4. If refreshing fails, or a request comes back `401`, log in again
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_client::FolioParams;
//! use folio_client::auth::RefreshTokenAuth;
//!
//! let params = FolioParams::new(
//!     "https://folio-etesting-snapshot-kong.ci.folio.org",
//!     "diku",
//!     "diku_admin",
//!     "admin",
//! )?;
//!
//! // Logs in immediately; bad credentials fail here.
//! let auth = RefreshTokenAuth::new(params).await?;
//! let token = auth.access_token().await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::COOKIE;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::tokens::{FolioTokens, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::auth::{AuthError, LOGIN_PATH, REFRESH_PATH, TENANT_HEADER};
use crate::config::FolioParams;

/// Timeout applied to login and refresh requests.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug)]
struct AuthState {
    params: FolioParams,
    client: reqwest::Client,
    tokens: Mutex<FolioTokens>,
}

/// Authentication handler for FOLIO's refresh token flow.
///
/// Cloning is cheap; clones share the same token pair, so one login serves
/// every client created from it. Token renewal is serialised: concurrent
/// callers wait for a single refresh and then reuse its result.
#[derive(Clone, Debug)]
pub struct RefreshTokenAuth {
    state: Arc<AuthState>,
}

// Verify RefreshTokenAuth is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RefreshTokenAuth>();
};

impl RefreshTokenAuth {
    /// Logs in to FOLIO and returns a handler holding the resulting tokens.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Http`] if the gateway cannot be reached
    /// - [`AuthError::LoginFailed`] if the tenant, username or password is rejected
    /// - [`AuthError::MissingToken`] / [`AuthError::InvalidResponse`] for malformed responses
    pub async fn new(params: FolioParams) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(AUTH_TIMEOUT)
            .build()?;

        let tokens = login(&client, &params).await?;

        Ok(Self {
            state: Arc::new(AuthState {
                params,
                client,
                tokens: Mutex::new(tokens),
            }),
        })
    }

    /// Returns the parameters this handler authenticates with.
    #[must_use]
    pub fn params(&self) -> &FolioParams {
        &self.state.params
    }

    /// Returns a snapshot of the current token pair.
    pub async fn tokens(&self) -> FolioTokens {
        self.state.tokens.lock().await.clone()
    }

    /// Returns an access token that is valid for at least the expiry margin.
    ///
    /// An expired access token is refreshed with the refresh token; if that is
    /// expired too, or the refresh is rejected, a full login is performed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if renewing the tokens fails.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut tokens = self.state.tokens.lock().await;
        if !tokens.access_expired() {
            return Ok(tokens.access_token.clone());
        }

        let renewed = self.renew(&tokens).await?;
        *tokens = renewed;
        Ok(tokens.access_token.clone())
    }

    /// Logs in again after the server rejected `rejected_token`.
    ///
    /// If another caller has already replaced the rejected token, the current
    /// token is returned without a new login.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the login fails.
    pub async fn reauthenticate(&self, rejected_token: &str) -> Result<String, AuthError> {
        let mut tokens = self.state.tokens.lock().await;
        if tokens.access_token != rejected_token {
            return Ok(tokens.access_token.clone());
        }

        warn!(
            tenant = self.state.params.auth_tenant().as_ref(),
            "FOLIO rejected the access token, logging in again"
        );
        let renewed = login(&self.state.client, &self.state.params).await?;
        *tokens = renewed;
        Ok(tokens.access_token.clone())
    }

    async fn renew(&self, current: &FolioTokens) -> Result<FolioTokens, AuthError> {
        let params = &self.state.params;

        if current.refresh_expired() {
            debug!("FOLIO refresh token expired, logging in again");
        } else {
            match refresh(&self.state.client, params, &current.refresh_token).await {
                Ok(tokens) => return Ok(tokens),
                Err(e @ AuthError::RefreshFailed { .. }) => {
                    warn!("{e}; falling back to login");
                }
                Err(e) => return Err(e),
            }
        }

        login(&self.state.client, params).await
    }
}

async fn login(client: &reqwest::Client, params: &FolioParams) -> Result<FolioTokens, AuthError> {
    let url = params.base_url().join(LOGIN_PATH);
    debug!(url = %url, tenant = params.auth_tenant().as_ref(), "Logging in to FOLIO");

    let response = client
        .post(&url)
        .header(TENANT_HEADER, params.auth_tenant().as_ref())
        .json(&LoginRequest {
            username: params.username().as_ref(),
            password: params.password().as_ref(),
        })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(AuthError::LoginFailed {
            status: status.as_u16(),
            message,
        });
    }

    let tokens = tokens_from_response(response).await?;
    info!(
        tenant = params.auth_tenant().as_ref(),
        username = params.username().as_ref(),
        access_expires = %tokens.access_expires,
        "Logged in to FOLIO"
    );
    Ok(tokens)
}

async fn refresh(
    client: &reqwest::Client,
    params: &FolioParams,
    refresh_token: &str,
) -> Result<FolioTokens, AuthError> {
    let url = params.base_url().join(REFRESH_PATH);
    debug!(url = %url, "Refreshing FOLIO tokens");

    let response = client
        .post(&url)
        .header(TENANT_HEADER, params.auth_tenant().as_ref())
        .header(COOKIE, format!("{REFRESH_TOKEN_COOKIE}={refresh_token}"))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(AuthError::RefreshFailed {
            status: status.as_u16(),
            message,
        });
    }

    let tokens = tokens_from_response(response).await?;
    info!(access_expires = %tokens.access_expires, "Refreshed FOLIO tokens");
    Ok(tokens)
}

async fn tokens_from_response(response: reqwest::Response) -> Result<FolioTokens, AuthError> {
    let issued_at = Utc::now();

    let mut access_token = None;
    let mut refresh_token = None;
    for cookie in response.cookies() {
        match cookie.name() {
            ACCESS_TOKEN_COOKIE => access_token = Some(cookie.value().to_string()),
            REFRESH_TOKEN_COOKIE => refresh_token = Some(cookie.value().to_string()),
            _ => {}
        }
    }

    let body = response.text().await?;
    FolioTokens::from_parts(access_token, refresh_token, &body, issued_at)
}
