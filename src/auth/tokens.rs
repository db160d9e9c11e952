//! FOLIO access and refresh token pairs.
//!
//! FOLIO's expiring-token login returns both tokens as cookies and their
//! expirations as a JSON body:
//!
//! ```text
//! Set-Cookie: folioAccessToken=eyJ...; Max-Age=600; Path=/; HttpOnly
//! Set-Cookie: folioRefreshToken=eyJ...; Max-Age=604800; Path=/authn; HttpOnly
//!
//! {"accessTokenExpiration":"2024-05-01T12:10:00Z","refreshTokenExpiration":"2024-05-08T12:00:00Z"}
//! ```

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;

use crate::auth::AuthError;

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "folioAccessToken";

/// Cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "folioRefreshToken";

/// Seconds before the reported expiration at which a token is treated as expired.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Assumed access token lifetime when neither the body nor the token says otherwise.
pub const DEFAULT_ACCESS_TOKEN_LIFETIME_SECS: i64 = 600;

/// Assumed refresh token lifetime when the body does not report one.
pub const DEFAULT_REFRESH_TOKEN_LIFETIME_SECS: i64 = 86_400;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenExpirationResponse {
    access_token_expiration: Option<DateTime<Utc>>,
    refresh_token_expiration: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
    exp: Option<i64>,
}

/// An access/refresh token pair with expirations.
///
/// Token values are masked in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct FolioTokens {
    /// Token sent as `x-okapi-token` on API requests.
    pub access_token: String,
    /// Token exchanged at `/authn/refresh` for a new pair.
    pub refresh_token: String,
    /// When the access token expires.
    pub access_expires: DateTime<Utc>,
    /// When the refresh token expires.
    pub refresh_expires: DateTime<Utc>,
}

impl FolioTokens {
    /// Builds a token pair from the cookies and body of a login or refresh response.
    ///
    /// Missing expirations fall back to the access token's JWT `exp` claim and
    /// then to the default lifetimes, counted from `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingToken`] if a cookie is absent and
    /// [`AuthError::InvalidResponse`] if a non-empty body is not valid JSON.
    pub fn from_parts(
        access_token: Option<String>,
        refresh_token: Option<String>,
        body: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let access_token = access_token.ok_or(AuthError::MissingToken {
            cookie: ACCESS_TOKEN_COOKIE,
        })?;
        let refresh_token = refresh_token.ok_or(AuthError::MissingToken {
            cookie: REFRESH_TOKEN_COOKIE,
        })?;

        let expirations = if body.trim().is_empty() {
            TokenExpirationResponse::default()
        } else {
            serde_json::from_str::<TokenExpirationResponse>(body).map_err(|e| {
                AuthError::InvalidResponse {
                    message: format!("Failed to parse token expirations: {e}"),
                }
            })?
        };

        let access_expires = expirations
            .access_token_expiration
            .or_else(|| jwt_expiration(&access_token))
            .unwrap_or_else(|| issued_at + Duration::seconds(DEFAULT_ACCESS_TOKEN_LIFETIME_SECS));
        let refresh_expires = expirations
            .refresh_token_expiration
            .unwrap_or_else(|| issued_at + Duration::seconds(DEFAULT_REFRESH_TOKEN_LIFETIME_SECS));

        Ok(Self {
            access_token,
            refresh_token,
            access_expires,
            refresh_expires,
        })
    }

    /// Returns `true` if the access token should no longer be used.
    #[must_use]
    pub fn access_expired(&self) -> bool {
        self.access_expired_at(Utc::now())
    }

    /// Returns `true` if the refresh token should no longer be used.
    #[must_use]
    pub fn refresh_expired(&self) -> bool {
        self.refresh_expired_at(Utc::now())
    }

    /// Returns `true` if the access token is within the expiry margin at `now`.
    #[must_use]
    pub fn access_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.access_expires - Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS)
    }

    /// Returns `true` if the refresh token is within the expiry margin at `now`.
    #[must_use]
    pub fn refresh_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.refresh_expires - Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS)
    }
}

impl fmt::Debug for FolioTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolioTokens")
            .field("access_token", &"*****")
            .field("refresh_token", &"*****")
            .field("access_expires", &self.access_expires)
            .field("refresh_expires", &self.refresh_expires)
            .finish()
    }
}

/// Reads the `exp` claim of a JWT without verifying its signature.
fn jwt_expiration(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .ok()?;

    Utc.timestamp_opt(data.claims.exp?, 0).single()
}
