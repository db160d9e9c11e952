//! HTTP-specific error types.
//!
//! - [`HttpResponseError`]: a non-2xx response from FOLIO
//! - [`MaxHttpRetriesExceededError`]: retries exhausted on a retryable status
//! - [`InvalidHttpRequestError`]: a request that fails validation before sending
//! - [`HttpError`]: the unified error returned by [`FolioClient`](super::FolioClient)
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_client::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(HttpError::Response(e)) => println!("FOLIO said {}: {}", e.code, e.message),
//!     Err(HttpError::MaxRetries(e)) => println!("gave up after {} tries", e.tries),
//!     Err(HttpError::Auth(e)) => println!("authentication failed: {e}"),
//!     Err(other) => println!("{other}"),
//! }
//! ```

use thiserror::Error;

use crate::auth::AuthError;

/// Error returned when a request receives a non-successful response.
///
/// # Example
///
/// ```rust
/// use folio_client::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: "User not found".to_string(),
///     request_id: Some("123456/users".to_string()),
/// };
///
/// assert_eq!(error.to_string(), "FOLIO returned 404: User not found");
/// ```
#[derive(Debug, Error)]
#[error("FOLIO returned {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The error message from the response body.
    pub message: String,
    /// The `X-Okapi-Request-Id` of the failed request, if present.
    pub request_id: Option<String>,
}

/// Error returned when maximum retry attempts have been exhausted.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last status {code}: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of attempts that were made.
    pub tries: u32,
    /// The error message from the last response.
    pub message: String,
    /// The `X-Okapi-Request-Id` of the last attempt, if present.
    pub request_id: Option<String>,
}

/// Error returned when a request fails validation.
///
/// # Example
///
/// ```rust
/// use folio_client::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "post".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot use post without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-2xx response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Logging in or refreshing the access token failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code behind this error, if there was a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            Self::Auth(e) => e.status(),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidRequest(_) => None,
        }
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
