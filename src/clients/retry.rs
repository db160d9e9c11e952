//! Retry policy for transient FOLIO failures.

use std::time::Duration;

use rand::Rng;

use crate::clients::http_request::HttpMethod;

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default backoff factor in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.5;

/// Upper bound for a single backoff wait.
pub const DEFAULT_MAX_BACKOFF_WAIT: Duration = Duration::from_secs(120);

/// Statuses that indicate a temporary condition on the server side.
pub const DEFAULT_STATUS_FORCELIST: [u16; 4] = [429, 502, 503, 504];

/// Decides whether and when a failed request is sent again.
///
/// Only idempotent methods are retried. A retryable status or a connection
/// failure triggers a wait of `backoff_factor * 2^(retry - 1)` seconds,
/// capped at `max_backoff_wait` and randomly shortened by up to
/// `backoff_jitter` of its length. A `Retry-After` header overrides the
/// computed wait when `respect_retry_after_header` is set.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use folio_client::clients::{HttpMethod, RetryPolicy};
///
/// let policy = RetryPolicy::new(3).with_jitter(0.0);
///
/// assert!(policy.is_retryable_method(HttpMethod::Get));
/// assert!(!policy.is_retryable_method(HttpMethod::Post));
/// assert!(policy.is_retryable_status(503));
/// assert_eq!(policy.backoff(3), Duration::from_secs(2));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub total: u32,
    /// Base of the exponential backoff, in seconds.
    pub backoff_factor: f64,
    /// Longest wait between two attempts.
    pub max_backoff_wait: Duration,
    /// Fraction of the wait that may be randomly removed, from 0 to 1.
    pub backoff_jitter: f64,
    /// Response statuses that are retried.
    pub status_forcelist: Vec<u16>,
    /// Whether a `Retry-After` header replaces the computed backoff.
    pub respect_retry_after_header: bool,
    /// Methods that are retried.
    pub allowed_methods: Vec<HttpMethod>,
}

impl RetryPolicy {
    /// Creates the default policy with `total` retries.
    #[must_use]
    pub fn new(total: u32) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Creates a policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Sets the backoff factor in seconds.
    #[must_use]
    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Sets the jitter fraction. Zero makes waits deterministic.
    #[must_use]
    pub fn with_jitter(mut self, backoff_jitter: f64) -> Self {
        self.backoff_jitter = backoff_jitter;
        self
    }

    /// Returns `true` if requests with `method` may be retried.
    #[must_use]
    pub fn is_retryable_method(&self, method: HttpMethod) -> bool {
        self.allowed_methods.contains(&method)
    }

    /// Returns `true` if a response with `code` should be retried.
    #[must_use]
    pub fn is_retryable_status(&self, code: u16) -> bool {
        self.status_forcelist.contains(&code)
    }

    /// Returns `true` for transport errors worth another attempt.
    #[must_use]
    pub fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_connect() || error.is_timeout()
    }

    /// Computes the wait before retry number `retry` (starting at 1).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let max_wait = self.max_backoff_wait.as_secs_f64();
        let wait = (self.backoff_factor * 2f64.powi(exponent))
            .min(max_wait)
            .max(0.0);

        let jitter = self.backoff_jitter.clamp(0.0, 1.0);
        let wait = if jitter > 0.0 {
            wait * rand::thread_rng().gen_range((1.0 - jitter)..=1.0)
        } else {
            wait
        };

        Duration::from_secs_f64(wait)
    }

    /// Computes the wait before retry number `retry`, preferring the
    /// server's `Retry-After` value when allowed.
    #[must_use]
    pub fn delay(&self, retry: u32, retry_after: Option<f64>) -> Duration {
        match retry_after {
            Some(seconds) if self.respect_retry_after_header => {
                Duration::from_secs_f64(seconds.min(self.max_backoff_wait.as_secs_f64()))
            }
            _ => self.backoff(retry),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            total: DEFAULT_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_backoff_wait: DEFAULT_MAX_BACKOFF_WAIT,
            backoff_jitter: 1.0,
            status_forcelist: DEFAULT_STATUS_FORCELIST.to_vec(),
            respect_retry_after_header: true,
            allowed_methods: vec![HttpMethod::Get, HttpMethod::Put, HttpMethod::Delete],
        }
    }
}
