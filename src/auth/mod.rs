//! Authentication against FOLIO.
//!
//! # Overview
//!
//! - [`RefreshTokenAuth`]: logs in, attaches and renews access tokens
//! - [`FolioTokens`]: an access/refresh token pair with expirations
//! - [`AuthError`]: failures while logging in or refreshing
//!
//! Every request to FOLIO names its tenant in the `x-okapi-tenant` header and
//! authenticates with the `x-okapi-token` header.

mod error;
mod refresh_token;
mod tokens;

pub use error::AuthError;
pub use refresh_token::{RefreshTokenAuth, AUTH_TIMEOUT};
pub use tokens::{
    FolioTokens, ACCESS_TOKEN_COOKIE, DEFAULT_ACCESS_TOKEN_LIFETIME_SECS,
    DEFAULT_REFRESH_TOKEN_LIFETIME_SECS, REFRESH_TOKEN_COOKIE, TOKEN_EXPIRY_MARGIN_SECS,
};

/// Header naming the tenant a request is for.
pub const TENANT_HEADER: &str = "x-okapi-tenant";

/// Header carrying the access token.
pub const TOKEN_HEADER: &str = "x-okapi-token";

/// Path of the expiring-token login endpoint.
pub const LOGIN_PATH: &str = "authn/login-with-expiry";

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "authn/refresh";
