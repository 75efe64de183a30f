//! Retry policy for catalog and asset requests.

use reqwest::StatusCode;
use std::time::Duration;

/// Backoff policy applied to idempotent GET requests.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Whether each retry doubles the previous delay.
    pub exponential_backoff: bool,
    /// Upper bound on any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl RetryStrategy {
    /// Creates a policy with the given attempt budget.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms: 250,
            exponential_backoff: true,
            max_delay_ms: 8_000,
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            exponential_backoff: false,
            max_delay_ms: 0,
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Enables or disables exponential backoff.
    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.exponential_backoff = enabled;
        self
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential_backoff {
            let shift = attempt.saturating_sub(1).min(20);
            self.base_delay_ms.saturating_mul(1u64 << shift)
        } else {
            self.base_delay_ms
        };

        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Longest wait between attempts.
    pub fn delay_cap(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Wait before the next attempt, honoring a server's `Retry-After` up to [`Self::delay_cap`].
    pub fn delay_with_hint(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        retry_after_secs.map_or_else(
            || self.delay_for_attempt(attempt),
            |secs| Duration::from_secs(secs).min(self.delay_cap()),
        )
    }

    /// True when another attempt is allowed after `attempt` failures.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Transport errors worth retrying: connection failures and timeouts.
    pub fn should_retry(&self, error: &reqwest::Error) -> bool {
        error.is_connect() || error.is_timeout()
    }

    /// Statuses worth retrying: rate limiting and upstream 5xx.
    ///
    /// A 404 is an answer, not a failure, and is never retried.
    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let strategy = RetryStrategy::default();

        assert_eq!(strategy.delay_for_attempt(1), Duration::from_millis(250));
        assert_eq!(strategy.delay_for_attempt(2), Duration::from_millis(500));
        assert_eq!(strategy.delay_for_attempt(3), Duration::from_millis(1000));
    }

    #[test]
    fn test_delay_is_capped() {
        let strategy = RetryStrategy::new(10).with_base_delay(Duration::from_secs(5));
        assert_eq!(strategy.delay_for_attempt(4), Duration::from_secs(8));
        assert_eq!(strategy.delay_for_attempt(64), Duration::from_secs(8));
    }

    #[test]
    fn test_retry_after_is_capped() {
        let strategy = RetryStrategy::default();
        assert_eq!(strategy.delay_with_hint(1, Some(86_400)), Duration::from_secs(8));
        assert_eq!(strategy.delay_with_hint(1, Some(2)), Duration::from_secs(2));
        assert_eq!(strategy.delay_with_hint(2, None), Duration::from_millis(500));
        assert_eq!(RetryStrategy::no_retry().delay_with_hint(1, Some(60)), Duration::ZERO);
    }

    #[test]
    fn test_attempt_budget() {
        let strategy = RetryStrategy::new(2);
        assert!(strategy.has_attempts_left(1));
        assert!(!strategy.has_attempts_left(2));
        assert!(!RetryStrategy::no_retry().has_attempts_left(1));
        assert_eq!(RetryStrategy::new(0).max_attempts, 1);
    }

    #[test]
    fn test_retryable_statuses() {
        let strategy = RetryStrategy::default();
        assert!(strategy.should_retry_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(strategy.should_retry_status(StatusCode::BAD_GATEWAY));
        assert!(!strategy.should_retry_status(StatusCode::NOT_FOUND));
        assert!(!strategy.should_retry_status(StatusCode::OK));
    }
}
