use std::time::Duration;

use rand::Rng;

use sakura_utils::env::{env_secs, env_u64};

use crate::error::ErrorKind;

/// Exponential backoff with jitter for outbound LLM calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound of the random extra wait added to each backoff.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            jitter: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_attempts = env_u64("LLM_MAX_ATTEMPTS", u64::from(defaults.max_attempts));

        Self {
            max_attempts: u32::try_from(max_attempts).unwrap_or(u32::MAX).max(1),
            base_delay: env_secs("LLM_RETRY_BASE_DELAY_SECONDS", defaults.base_delay),
            max_delay: env_secs("LLM_RETRY_MAX_DELAY_SECONDS", defaults.max_delay),
            jitter: defaults.jitter,
        }
    }

    /// Whether attempt number `attempt` (1-based) may be followed by another.
    pub fn should_retry(&self, kind: ErrorKind, attempt: u32) -> bool {
        kind != ErrorKind::Terminal && attempt < self.max_attempts
    }

    /// Wait before the attempt following `attempt` (1-based).
    ///
    /// A provider `retry_after` hint can lengthen the wait; the result never
    /// exceeds `max_delay`.
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let exponential = self.base_delay.saturating_mul(1_u32 << exponent);
        let delay = exponential.saturating_add(self.random_jitter());

        delay
            .max(retry_after.unwrap_or_default())
            .min(self.max_delay)
    }

    fn random_jitter(&self) -> Duration {
        let max_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }

        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RetryPolicy;
    use crate::error::ErrorKind;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            jitter: Duration::from_millis(250),
        }
    }

    #[test]
    fn terminal_errors_are_never_retried() {
        assert!(!policy().should_retry(ErrorKind::Terminal, 1));
        assert!(policy().should_retry(ErrorKind::Transient, 1));
        assert!(policy().should_retry(ErrorKind::RateLimited, 2));
        assert!(!policy().should_retry(ErrorKind::Transient, 3));
    }

    #[test]
    fn backoff_grows_exponentially_within_jitter() {
        let policy = policy();
        for (attempt, base_secs) in [(1, 1), (2, 2), (3, 4)] {
            let delay = policy.backoff(attempt, None);
            let floor = Duration::from_secs(base_secs);
            assert!(delay >= floor, "attempt {attempt}: {delay:?}");
            assert!(delay <= floor + Duration::from_millis(250), "attempt {attempt}: {delay:?}");
        }
    }

    #[test]
    fn backoff_is_capped() {
        let policy = policy();
        assert_eq!(policy.backoff(10, None), Duration::from_secs(8));
        assert_eq!(
            policy.backoff(1, Some(Duration::from_secs(60))),
            Duration::from_secs(8)
        );
    }

    #[test]
    fn retry_after_hint_lengthens_the_wait() {
        let delay = policy().backoff(1, Some(Duration::from_secs(5)));
        assert_eq!(delay, Duration::from_secs(5));
    }
}
