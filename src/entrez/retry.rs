//! Retry policy with linearly increasing backoff for record fetches.
//!
//! This module provides the [`RetryPolicy`] and [`FailureType`] types for
//! classifying request errors and deciding whether another attempt is made.
//!
//! # Overview
//!
//! Attempts are numbered from 0. Attempt 0 fires immediately; attempt `k`
//! (k ≥ 1) is preceded by a wait of `initial_delay * (k + 1)`. With the
//! defaults (3 attempts, 1 s) the waits before attempts 0, 1, 2 are
//! 0 s, 2 s, 3 s.
//!
//! When a request fails, the error is classified into a [`FailureType`]:
//! - [`FailureType::Transient`] - network errors, timeouts, 5xx, malformed bodies
//! - [`FailureType::Permanent`] - every other HTTP status, invalid URLs
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use pubmed_affiliations::entrez::{FetchError, FailureType, RetryDecision, RetryPolicy, classify_error};
//!
//! let policy = RetryPolicy::default();
//! let error = FetchError::http_status("https://example.com/efetch.fcgi", 503);
//! assert_eq!(classify_error(&error), FailureType::Transient);
//!
//! match policy.should_retry(classify_error(&error), 0) {
//!     RetryDecision::Retry { delay, attempt } => {
//!         assert_eq!(attempt, 1);
//!         assert_eq!(delay, Duration::from_secs(2));
//!     }
//!     RetryDecision::DoNotRetry { .. } => unreachable!(),
//! }
//! ```

use std::time::Duration;

use tracing::{debug, instrument};

use super::FetchError;

/// Default attempt budget for one record.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff unit (1 second).
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Classification of request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Temporary failure that may succeed on retry.
    ///
    /// Examples: network timeout, 5xx server errors, truncated XML.
    Transient,

    /// Failure that won't succeed regardless of retries.
    ///
    /// Examples: 404 Not Found, 400 Bad Request, invalid URL.
    Permanent,
}

/// Decision on whether to retry a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay.
    Retry {
        /// How long to wait before the next attempt.
        delay: Duration,
        /// Index of the next attempt (0-based, so the first retry is attempt 1).
        attempt: u32,
    },

    /// Give up.
    DoNotRetry {
        /// Human-readable reason why no retry is attempted.
        reason: String,
    },
}

/// Attempt budget and linear backoff configuration.
///
/// # Default Values
///
/// - `max_attempts`: 3
/// - `initial_delay`: 1 second
///
/// # Delay Calculation
///
/// ```text
/// delay(0) = 0
/// delay(k) = initial_delay * (k + 1)     for k >= 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,

    /// Backoff unit.
    initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Creates a retry policy.
    ///
    /// `max_attempts` is clamped to at least 1 so every fetch issues one request.
    #[must_use]
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    /// Creates a policy with a custom `max_attempts` and the default delay.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, DEFAULT_INITIAL_DELAY)
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the backoff unit.
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Wait applied before the attempt with the given 0-based index.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.initial_delay
            .checked_mul(attempt.saturating_add(1))
            .unwrap_or(Duration::MAX)
    }

    /// Determines whether to retry after the attempt `attempt` (0-based) failed.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure - retry would not help".to_string(),
            };
        }

        let next = attempt.saturating_add(1);
        if next >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = self.delay_before(next);
        debug!(
            attempt,
            next_attempt = next,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: next,
        }
    }
}

/// Classifies a request error into a failure type for retry decisions.
///
/// | Error | Type |
/// |-------|------|
/// | HTTP 5xx | Transient |
/// | any other non-2xx HTTP status | Permanent |
/// | Timeout | Transient |
/// | Network (any transport failure) | Transient |
/// | Malformed content | Transient |
/// | Invalid URL / client build | Permanent |
#[instrument]
pub fn classify_error(error: &FetchError) -> FailureType {
    match error {
        FetchError::HttpStatus { status, .. } => classify_http_status(*status),

        FetchError::Network { .. }
        | FetchError::Timeout { .. }
        | FetchError::MalformedContent { .. } => FailureType::Transient,

        FetchError::InvalidUrl { .. } | FetchError::ClientBuild { .. } => FailureType::Permanent,
    }
}

/// Only server-side errors are worth another attempt.
fn classify_http_status(status: u16) -> FailureType {
    if (500..600).contains(&status) {
        FailureType::Transient
    } else {
        FailureType::Permanent
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ==================== RetryPolicy Tests ====================

    #[test]
    fn test_retry_policy_default_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.initial_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_retry_policy_max_attempts_minimum_is_one() {
        let policy = RetryPolicy::with_max_attempts(0);
        assert_eq!(policy.max_attempts(), 1);
    }

    // ==================== Delay Calculation Tests ====================

    #[test]
    fn test_delay_before_first_attempt_is_zero() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(0), Duration::ZERO);
    }

    #[test]
    fn test_delay_grows_linearly_not_exponentially() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        assert_eq!(policy.delay_before(1), Duration::from_secs(2));
        assert_eq!(policy.delay_before(2), Duration::from_secs(3));
        assert_eq!(policy.delay_before(3), Duration::from_secs(4));
        assert_eq!(policy.delay_before(4), Duration::from_secs(5));
    }

    #[test]
    fn test_delay_scales_with_initial_delay() {
        let policy = RetryPolicy::new(3, Duration::from_millis(250));
        assert_eq!(policy.delay_before(1), Duration::from_millis(500));
        assert_eq!(policy.delay_before(2), Duration::from_millis(750));
    }

    #[test]
    fn test_delay_saturates_instead_of_overflowing() {
        let policy = RetryPolicy::new(3, Duration::MAX);
        assert_eq!(policy.delay_before(u32::MAX), Duration::MAX);
    }

    // ==================== Should Retry Decision Tests ====================

    #[test]
    fn test_default_schedule_waits_zero_two_three_seconds() {
        let policy = RetryPolicy::default();

        let first = policy.should_retry(FailureType::Transient, 0);
        assert_eq!(
            first,
            RetryDecision::Retry {
                delay: Duration::from_secs(2),
                attempt: 1
            }
        );

        let second = policy.should_retry(FailureType::Transient, 1);
        assert_eq!(
            second,
            RetryDecision::Retry {
                delay: Duration::from_secs(3),
                attempt: 2
            }
        );

        let third = policy.should_retry(FailureType::Transient, 2);
        assert!(matches!(third, RetryDecision::DoNotRetry { .. }));
        if let RetryDecision::DoNotRetry { reason } = third {
            assert!(reason.contains("exhausted"));
        }
    }

    #[test]
    fn test_should_retry_permanent_does_not_retry() {
        let policy = RetryPolicy::default();
        let decision = policy.should_retry(FailureType::Permanent, 0);
        assert!(matches!(decision, RetryDecision::DoNotRetry { .. }));
        if let RetryDecision::DoNotRetry { reason } = decision {
            assert!(reason.contains("permanent"));
        }
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = RetryPolicy::with_max_attempts(1);
        let decision = policy.should_retry(FailureType::Transient, 0);
        assert!(matches!(decision, RetryDecision::DoNotRetry { .. }));
    }

    // ==================== Error Classification Tests ====================

    #[test]
    fn test_classify_http_500_transient() {
        let error = FetchError::http_status("http://example.com", 500);
        assert_eq!(classify_error(&error), FailureType::Transient);
    }

    #[test]
    fn test_classify_http_503_transient() {
        let error = FetchError::http_status("http://example.com", 503);
        assert_eq!(classify_error(&error), FailureType::Transient);
    }

    #[test]
    fn test_classify_http_404_permanent() {
        let error = FetchError::http_status("http://example.com", 404);
        assert_eq!(classify_error(&error), FailureType::Permanent);
    }

    #[test]
    fn test_classify_http_429_permanent() {
        let error = FetchError::http_status("http://example.com", 429);
        assert_eq!(classify_error(&error), FailureType::Permanent);
    }

    #[test]
    fn test_classify_http_400_permanent() {
        let error = FetchError::http_status("http://example.com", 400);
        assert_eq!(classify_error(&error), FailureType::Permanent);
    }

    #[test]
    fn test_classify_timeout_transient() {
        let error = FetchError::timeout("http://example.com");
        assert_eq!(classify_error(&error), FailureType::Transient);
    }

    #[test]
    fn test_classify_malformed_transient() {
        let error = FetchError::malformed("http://example.com", "unexpected EOF");
        assert_eq!(classify_error(&error), FailureType::Transient);
    }

    #[tokio::test]
    async fn test_classify_network_transient_regardless_of_url_text() {
        for url in [
            "http://127.0.0.1:9/eutils/efetch.fcgi",
            "http://127.0.0.1:9/ssl/tls/certificate/handshake/efetch.fcgi",
        ] {
            let source = reqwest::Client::new().get(url).send().await.unwrap_err();
            let error = FetchError::from_reqwest(url, source);
            assert!(matches!(error, FetchError::Network { .. }), "{error}");
            assert_eq!(classify_error(&error), FailureType::Transient, "{url}");
        }
    }

    #[test]
    fn test_classify_invalid_url_permanent() {
        let error = FetchError::invalid_url("not-a-url");
        assert_eq!(classify_error(&error), FailureType::Permanent);
    }

    #[test]
    fn test_default_max_retries_constant() {
        assert_eq!(DEFAULT_MAX_RETRIES, 3);
    }
}
