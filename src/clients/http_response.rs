//! HTTP response types.
//!
//! [`HttpResponse`] keeps the status, headers and parsed JSON body of a FOLIO
//! response, plus accessors for the envelope FOLIO wraps collections in.

use std::collections::HashMap;

/// An HTTP response from FOLIO.
///
/// Collection endpoints answer with an envelope like
/// `{"users": [...], "totalRecords": 42}`. ERM endpoints use `totalRecords`
/// as well when called with `stats=true`, and a bare array otherwise.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use folio_client::clients::HttpResponse;
/// use serde_json::json;
///
/// let response = HttpResponse::new(
///     200,
///     HashMap::new(),
///     json!({"users": [{"id": "1"}, {"id": "2"}], "totalRecords": 2}),
/// );
///
/// assert!(response.is_ok());
/// assert_eq!(response.total_records(), Some(2));
/// assert_eq!(response.records().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body. Text bodies are kept as a JSON string.
    pub body: serde_json::Value,
    /// Seconds to wait before retrying (from `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0);

        Self {
            code,
            headers,
            body,
            retry_request_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Okapi-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-okapi-request-id")
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `totalRecords` count of a collection response.
    #[must_use]
    pub fn total_records(&self) -> Option<u64> {
        self.body.get("totalRecords").and_then(serde_json::Value::as_u64)
    }

    /// Returns the records of a collection response.
    ///
    /// This is the body itself when it is an array, otherwise the first
    /// array-valued field of the envelope in the order the server sent it.
    /// Empty when there is neither.
    #[must_use]
    pub fn records(&self) -> &[serde_json::Value] {
        match &self.body {
            serde_json::Value::Array(records) => records,
            serde_json::Value::Object(fields) => fields
                .values()
                .find_map(serde_json::Value::as_array)
                .map_or(&[], Vec::as_slice),
            _ => &[],
        }
    }
}
