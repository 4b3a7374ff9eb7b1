//! Retry policy applied at the upstream-call boundary.

use std::time::Duration;

use reqwest::StatusCode;

/// Default number of retries after the initial attempt.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff before the first retry; doubles on each retry.
const DEFAULT_BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Bounded retry with exponential backoff.
///
/// Retries transport failures, HTTP 429 and 5xx. Other 4xx responses are
/// returned to the caller immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Backoff before the first retry.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: DEFAULT_BASE_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(2u32.saturating_pow(exponent))
    }

    /// Whether an HTTP status is worth another attempt.
    #[must_use]
    pub fn is_retryable_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// Whether a transport error is worth another attempt.
    ///
    /// Request construction and body decoding failures are not.
    #[must_use]
    pub fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect() || error.is_request()
    }
}
