use std::time::Duration;

/// Default number of attempts per endpoint before falling back.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay after the first failed attempt.
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(500);

/// Default hard deadline for a single attempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest exponent applied to the base backoff. Keeps the shift in range.
const MAX_BACKOFF_EXPONENT: u32 = 31;

/// Retry configuration for one orchestration run.
///
/// Passed explicitly to every [`fetch`](crate::FetchOrchestrator::fetch) call,
/// so independent callers (and tests) can run with different budgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts against a single endpoint. Values below 1 are treated as 1.
    pub max_attempts_per_endpoint: u32,
    /// Delay after the first failed attempt; doubles after each further failure.
    pub base_backoff: Duration,
    /// Hard deadline for each individual attempt.
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts_per_endpoint: DEFAULT_MAX_ATTEMPTS,
            base_backoff: DEFAULT_BASE_BACKOFF,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts_per_endpoint: u32, base_backoff: Duration, request_timeout: Duration) -> Self {
        Self {
            max_attempts_per_endpoint,
            base_backoff,
            request_timeout,
        }
    }

    /// Attempt budget per endpoint, never less than one.
    pub fn attempts_per_endpoint(&self) -> u32 {
        self.max_attempts_per_endpoint.max(1)
    }

    /// Delay to wait after failed attempt `attempt` (1-indexed) before the
    /// next attempt on the same endpoint: `base_backoff * 2^(attempt - 1)`.
    ///
    /// ```
    /// use std::time::Duration;
    /// use hospitals_upstream::RetryPolicy;
    ///
    /// let policy = RetryPolicy {
    ///     base_backoff: Duration::from_millis(500),
    ///     ..RetryPolicy::default()
    /// };
    /// assert_eq!(policy.backoff_after(1), Duration::from_millis(500));
    /// assert_eq!(policy.backoff_after(2), Duration::from_millis(1000));
    /// assert_eq!(policy.backoff_after(3), Duration::from_millis(2000));
    /// ```
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        self.base_backoff.saturating_mul(1u32 << exponent)
    }
}
