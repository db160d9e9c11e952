//! HTTP client types for FOLIO communication.
//!
//! This module provides the HTTP layer for making authenticated requests to
//! FOLIO. It handles request/response processing, token headers and retry
//! logic.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`FolioClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to FOLIO
//! - [`HttpResponse`]: A parsed response from FOLIO
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`DataType`]: Content types for request bodies
//! - [`RetryPolicy`]: When and how long to wait before resending
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_client::{default_client_factory, FolioParams, HttpMethod, HttpRequest};
//!
//! let factory = default_client_factory(params).await?;
//! let client = factory.create(None)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/groups")
//!     .query_param("limit", 10)
//!     .build()
//!     .unwrap();
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **429, 502, 503, 504**: retried with exponential backoff, or after the
//!   `Retry-After` delay when FOLIO sends one
//! - **Connection failures and timeouts**: retried with exponential backoff
//! - **401**: one new login, then the request is resent
//! - **Other errors (4xx, 500)**: returned immediately
//!
//! Only GET, PUT and DELETE are retried.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod retry;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{FolioClient, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use retry::{
    RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_BACKOFF_WAIT, DEFAULT_RETRIES,
    DEFAULT_STATUS_FORCELIST,
};
