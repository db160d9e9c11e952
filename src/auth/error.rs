//! Error types for FOLIO Refresh Token Auth.
//!
//! # Example
//!
//! ```rust
//! use folio_client::auth::AuthError;
//!
//! let error = AuthError::LoginFailed {
//!     status: 422,
//!     message: "Password does not match".to_string(),
//! };
//! assert!(error.to_string().contains("422"));
//! ```

use thiserror::Error;

/// Errors that can occur while logging in to FOLIO or refreshing tokens.
///
/// A gateway that cannot be reached surfaces as [`AuthError::Http`]; a
/// reachable gateway that rejects the tenant, username or password surfaces
/// as [`AuthError::LoginFailed`].
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login request returned a non-success HTTP status.
    #[error("FOLIO login failed with status {status}: {message}")]
    LoginFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The response body.
        message: String,
    },

    /// The refresh request returned a non-success HTTP status.
    #[error("FOLIO token refresh failed with status {status}: {message}")]
    RefreshFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The response body.
        message: String,
    },

    /// A successful response did not set an expected token cookie.
    #[error("FOLIO response did not set the '{cookie}' cookie")]
    MissingToken {
        /// The name of the missing cookie.
        cookie: &'static str,
    },

    /// A successful response body could not be parsed.
    #[error("Invalid FOLIO authentication response: {message}")]
    InvalidResponse {
        /// Description of the parse failure.
        message: String,
    },

    /// Network or connection error.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// Returns the HTTP status of a rejected login or refresh, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::LoginFailed { status, .. } | Self::RefreshFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Verify AuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failed_includes_status_and_message() {
        let error = AuthError::LoginFailed {
            status: 400,
            message: "No tenant".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("No tenant"));
        assert_eq!(error.status(), Some(400));
    }

    #[test]
    fn test_missing_token_names_cookie() {
        let error = AuthError::MissingToken {
            cookie: "folioAccessToken",
        };
        assert!(error.to_string().contains("folioAccessToken"));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_refresh_failed_status() {
        let error = AuthError::RefreshFailed {
            status: 401,
            message: String::new(),
        };
        assert_eq!(error.status(), Some(401));
    }
}
