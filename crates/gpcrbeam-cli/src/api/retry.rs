//! Retry policy for GPCRdb requests
//!
//! Pure scheduling logic, no I/O: which statuses are worth retrying, how many
//! retries are allowed and how long to wait before each one. The client drives
//! the actual loop.

use std::time::Duration;

/// HTTP statuses that are retried: rate limiting and transient server errors
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Statuses whose `Retry-After` header is honoured
const RETRY_AFTER_STATUSES: [u16; 2] = [429, 503];

/// Default base delay; the n-th retry waits `factor * 2^(n-1)`
pub const DEFAULT_BACKOFF_FACTOR: Duration = Duration::from_secs(2);

/// Upper bound for any single delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Exponential backoff policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_factor: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    /// Policy allowing `max_retries` retries after the first attempt
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_backoff: MAX_BACKOFF,
        }
    }

    /// Override the base delay
    pub fn with_backoff_factor(mut self, factor: Duration) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Override the delay cap
    pub fn with_max_backoff(mut self, cap: Duration) -> Self {
        self.max_backoff = cap;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether a response status should be retried
    pub fn is_retryable_status(&self, status: u16) -> bool {
        RETRYABLE_STATUSES.contains(&status)
    }

    /// Whether a `Retry-After` header on this status should be honoured
    pub fn honours_retry_after(&self, status: u16) -> bool {
        RETRY_AFTER_STATUSES.contains(&status)
    }

    /// Computed delay before retry number `retry` (1-based)
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        self.backoff_factor
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }

    /// Delay before the next retry, or `None` once `retries_done` exhausts the budget.
    ///
    /// A server-supplied `Retry-After` replaces the computed delay (still capped).
    pub fn next_delay(&self, retries_done: u32, retry_after: Option<Duration>) -> Option<Duration> {
        if retries_done >= self.max_retries {
            return None;
        }
        let delay = match retry_after {
            Some(requested) => requested.min(self.max_backoff),
            None => self.backoff_for(retries_done + 1),
        };
        Some(delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Parse a `Retry-After` value given in delta seconds.
///
/// HTTP-date values are ignored and fall back to the computed backoff.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let policy = RetryPolicy::default();
        for status in [429, 500, 502, 503, 504] {
            assert!(policy.is_retryable_status(status), "{status} should retry");
        }
        for status in [200, 400, 401, 403, 404, 501, 505] {
            assert!(!policy.is_retryable_status(status), "{status} should not retry");
        }
        assert!(policy.honours_retry_after(429));
        assert!(!policy.honours_retry_after(500));
    }

    #[test]
    fn test_exponential_schedule() {
        let policy = RetryPolicy::new(5);
        let delays: Vec<u64> = (1..=5).map(|n| policy.backoff_for(n).as_secs()).collect();
        assert_eq!(delays, vec![2, 4, 8, 16, 32]);
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::new(50).with_max_backoff(Duration::from_secs(10));
        assert_eq!(policy.backoff_for(4), Duration::from_secs(10));
        assert_eq!(policy.backoff_for(40), Duration::from_secs(10));
    }

    #[test]
    fn test_next_delay_stops_at_budget() {
        let policy = RetryPolicy::new(2).with_backoff_factor(Duration::from_millis(10));
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.next_delay(0, None), Some(Duration::from_millis(10)));
        assert_eq!(policy.next_delay(1, None), Some(Duration::from_millis(20)));
        assert_eq!(policy.next_delay(2, None), None);
    }

    #[test]
    fn test_zero_retries_never_waits() {
        let policy = RetryPolicy::new(0);
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.next_delay(0, None), None);
    }

    #[test]
    fn test_retry_after_overrides_and_is_capped() {
        let policy = RetryPolicy::new(3);
        assert_eq!(
            policy.next_delay(0, Some(Duration::from_secs(7))),
            Some(Duration::from_secs(7))
        );
        assert_eq!(
            policy.next_delay(0, Some(Duration::from_secs(3600))),
            Some(MAX_BACKOFF)
        );
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_retry_after(" 0 "), Some(Duration::ZERO));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }
}
