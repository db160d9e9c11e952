//! HTTP client for FOLIO communication.
//!
//! This module provides the [`FolioClient`] type for making authenticated
//! requests to FOLIO with automatic retry handling.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::auth::{RefreshTokenAuth, TENANT_HEADER, TOKEN_HEADER};
use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::RetryPolicy;
use crate::config::{BaseUrl, Tenant};
use crate::query::QueryParameters;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to FOLIO.
///
/// The client handles:
/// - URL construction against the configured base URL
/// - Default headers including User-Agent and `x-okapi-tenant`
/// - The `x-okapi-token` header from [`RefreshTokenAuth`], renewed as needed
/// - One fresh login when FOLIO rejects a token with 401
/// - Retries with exponential backoff, per [`RetryPolicy`]
///
/// Clients are normally obtained from a [`ClientFactory`](crate::ClientFactory).
///
/// # Thread Safety
///
/// `FolioClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use folio_client::{FolioClient, HttpMethod, HttpRequest, QueryParams};
///
/// let params = QueryParams::new(Some("active==true".into()));
/// let response = client.get("/users", &params.stats()).await?;
/// println!("{} active users", response.total_records().unwrap_or_default());
/// ```
#[derive(Debug)]
pub struct FolioClient {
    client: reqwest::Client,
    base_url: BaseUrl,
    default_headers: HashMap<String, String>,
    auth: Option<RefreshTokenAuth>,
    retry: RetryPolicy,
}

// Verify FolioClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FolioClient>();
};

impl FolioClient {
    /// Creates a new client for one tenant.
    ///
    /// Without `auth` the client sends no token, which is only useful for
    /// FOLIO's few public endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying HTTP client cannot
    /// be created (e.g. TLS initialization failure).
    pub fn new(
        base_url: BaseUrl,
        tenant: &Tenant,
        auth: Option<RefreshTokenAuth>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!("folio-client v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(TENANT_HEADER.to_string(), tenant.as_ref().to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            default_headers,
            auth,
            retry,
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the retry policy for this client.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the authentication shared by this client, if any.
    #[must_use]
    pub const fn auth(&self) -> Option<&RefreshTokenAuth> {
        self.auth.as_ref()
    }

    /// Sends a GET request with the given query parameters.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(
        &self,
        path: &str,
        params: &QueryParameters,
    ) -> Result<HttpResponse, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Get, path);
        if !params.is_empty() {
            builder = builder.query(params.clone());
        }
        self.request(builder.build()?).await
    }

    /// Sends an HTTP request to FOLIO.
    ///
    /// Responses with a status in the policy's forcelist and connection
    /// failures are retried for idempotent methods. A 401 triggers one new
    /// login and a resend; a second 401 is returned as an error.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Logging in or refreshing fails (`Auth`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    /// - Retries are exhausted (`MaxRetries`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.base_url.join(&request.path);

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let retryable = self.retry.is_retryable_method(request.http_method);
        let mut retries: u32 = 0;
        let mut reauthenticated = false;
        loop {
            let token = match &self.auth {
                Some(auth) => Some(auth.access_token().await?),
                None => None,
            };

            let response = match self.send(&request, &url, &headers, token.as_deref()).await {
                Ok(response) => response,
                Err(error)
                    if retryable
                        && retries < self.retry.total
                        && RetryPolicy::is_retryable_error(&error) =>
                {
                    retries += 1;
                    let delay = self.retry.backoff(retries);
                    debug!(
                        %url,
                        retry = retries,
                        ?delay,
                        "Request to FOLIO failed, retrying: {error}"
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(error) => return Err(error.into()),
            };

            if response.is_ok() {
                return Ok(response);
            }

            if response.code == 401 && !reauthenticated {
                if let (Some(auth), Some(token)) = (&self.auth, &token) {
                    auth.reauthenticate(token).await?;
                    reauthenticated = true;
                    continue;
                }
            }

            let message = Self::serialize_error(&response);
            let request_id = response.request_id().map(String::from);

            if !(retryable && self.retry.is_retryable_status(response.code)) {
                return Err(HttpResponseError {
                    code: response.code,
                    message,
                    request_id,
                }
                .into());
            }

            if retries >= self.retry.total {
                if self.retry.total == 0 {
                    return Err(HttpResponseError {
                        code: response.code,
                        message,
                        request_id,
                    }
                    .into());
                }
                warn!(
                    %url,
                    status = response.code,
                    tries = retries + 1,
                    "Giving up on FOLIO request"
                );
                return Err(MaxHttpRetriesExceededError {
                    code: response.code,
                    tries: retries + 1,
                    message,
                    request_id,
                }
                .into());
            }

            retries += 1;
            let delay = self.retry.delay(retries, response.retry_request_after);
            debug!(
                %url,
                status = response.code,
                retry = retries,
                ?delay,
                "FOLIO is temporarily unavailable, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Sends a single attempt and parses the response.
    async fn send(
        &self,
        request: &HttpRequest,
        url: &str,
        headers: &HashMap<String, String>,
        token: Option<&str>,
    ) -> Result<HttpResponse, reqwest::Error> {
        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(token) = token {
            req_builder = req_builder.header(TOKEN_HEADER, token);
        }
        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        Ok(HttpResponse::new(code, res_headers, Self::parse_body(body_text)))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// FOLIO answers many errors in plain text, so non-JSON bodies are kept
    /// as a JSON string.
    fn parse_body(body_text: String) -> serde_json::Value {
        if body_text.trim().is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(&body_text).unwrap_or(serde_json::Value::String(body_text))
    }

    /// Extracts a readable message from an error response.
    fn serialize_error(response: &HttpResponse) -> String {
        match &response.body {
            serde_json::Value::String(text) => text.clone(),
            body => body
                .get("errors")
                .and_then(serde_json::Value::as_array)
                .and_then(|errors| errors.first())
                .and_then(|error| error.get("message"))
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| body.to_string(), String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_client() -> FolioClient {
        FolioClient::new(
            BaseUrl::new("https://folio-snapshot-okapi.dev.folio.org/").unwrap(),
            &Tenant::new("diku").unwrap(),
            None,
            RetryPolicy::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_has_no_trailing_slash() {
        let client = create_test_client();
        assert_eq!(
            client.base_url().as_ref(),
            "https://folio-snapshot-okapi.dev.folio.org"
        );
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = create_test_client();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("folio-client v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_tenant_header_is_set() {
        let client = create_test_client();
        assert_eq!(
            client.default_headers().get(TENANT_HEADER),
            Some(&"diku".to_string())
        );
        assert!(client.default_headers().get(TOKEN_HEADER).is_none());
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = create_test_client();
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_parse_body_keeps_plain_text() {
        assert_eq!(FolioClient::parse_body(String::new()), json!({}));
        assert_eq!(
            FolioClient::parse_body("Invalid token".to_string()),
            json!("Invalid token")
        );
        assert_eq!(
            FolioClient::parse_body(r#"{"id": "1"}"#.to_string()),
            json!({"id": "1"})
        );
    }

    #[test]
    fn test_serialize_error_prefers_first_error_message() {
        let response = HttpResponse::new(
            422,
            HashMap::new(),
            json!({"errors": [{"message": "must not be null", "type": "1"}]}),
        );
        assert_eq!(FolioClient::serialize_error(&response), "must not be null");

        let response = HttpResponse::new(400, HashMap::new(), json!("bad query"));
        assert_eq!(FolioClient::serialize_error(&response), "bad query");
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FolioClient>();
    }
}
