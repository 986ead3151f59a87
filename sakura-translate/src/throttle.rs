//! Admission control in front of outbound LLM calls: a minimum spacing
//! between calls plus a ceiling per fixed window.

use std::time::Duration;

use sakura_utils::env::{env_secs, env_string, env_u64};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

const DEFAULT_WINDOW: Duration = Duration::from_secs(60);
const DEFAULT_MIN_SPACING: Duration = Duration::from_secs(1);
const DEFAULT_MAX_CALLS_PER_WINDOW: u32 = 50;

/// What to do when the window's ceiling has been reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrottlePolicy {
    /// Sleep until the window rolls over.
    #[default]
    Wait,
    /// Refuse immediately so the caller can use its local fallback.
    Fallback,
}

impl ThrottlePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "wait" => Some(Self::Wait),
            "fallback" => Some(Self::Fallback),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Granted,
    Denied,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThrottleConfig {
    pub window: Duration,
    pub min_spacing: Duration,
    pub max_calls_per_window: u32,
    pub policy: ThrottlePolicy,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            min_spacing: DEFAULT_MIN_SPACING,
            max_calls_per_window: DEFAULT_MAX_CALLS_PER_WINDOW,
            policy: ThrottlePolicy::Wait,
        }
    }
}

impl ThrottleConfig {
    pub fn from_env() -> Self {
        let max_calls = env_u64(
            "MAX_REQUESTS_PER_MINUTE",
            u64::from(DEFAULT_MAX_CALLS_PER_WINDOW),
        );
        let policy = match env_string("THROTTLE_POLICY") {
            Some(raw) => ThrottlePolicy::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown THROTTLE_POLICY, using wait");
                ThrottlePolicy::Wait
            }),
            None => ThrottlePolicy::Wait,
        };

        Self {
            window: env_secs("THROTTLE_WINDOW_SECONDS", DEFAULT_WINDOW),
            min_spacing: env_secs("TRANSLATION_COOLDOWN_SECONDS", DEFAULT_MIN_SPACING),
            max_calls_per_window: u32::try_from(max_calls).unwrap_or(u32::MAX),
            policy,
        }
    }
}

#[derive(Debug, Default)]
struct ThrottleState {
    window_start: Option<Instant>,
    calls_in_window: u32,
    last_call: Option<Instant>,
}

#[derive(Debug)]
pub struct RequestThrottle {
    config: ThrottleConfig,
    state: Mutex<ThrottleState>,
}

impl RequestThrottle {
    pub fn new(mut config: ThrottleConfig) -> Self {
        config.max_calls_per_window = config.max_calls_per_window.max(1);
        Self {
            config,
            state: Mutex::new(ThrottleState::default()),
        }
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    /// Wait for permission to make one outbound call.
    ///
    /// The lock is held across every sleep, so concurrent callers are
    /// admitted strictly one after another.
    pub async fn acquire(&self) -> Admission {
        let mut state = self.state.lock().await;

        let now = Instant::now();
        let window_start = match state.window_start {
            Some(start) if now.duration_since(start) < self.config.window => start,
            _ => {
                state.window_start = Some(now);
                state.calls_in_window = 0;
                now
            }
        };

        if state.calls_in_window >= self.config.max_calls_per_window {
            match self.config.policy {
                ThrottlePolicy::Fallback => {
                    warn!(
                        calls = state.calls_in_window,
                        "request ceiling reached, refusing call"
                    );
                    return Admission::Denied;
                }
                ThrottlePolicy::Wait => {
                    let rollover = window_start + self.config.window;
                    warn!(
                        wait_ms = rollover.saturating_duration_since(now).as_millis() as u64,
                        "request ceiling reached, waiting for next window"
                    );
                    sleep_until(rollover).await;
                    state.window_start = Some(Instant::now());
                    state.calls_in_window = 0;
                }
            }
        }

        if let Some(last_call) = state.last_call {
            let ready_at = last_call + self.config.min_spacing;
            let now = Instant::now();
            if now < ready_at {
                debug!(
                    wait_ms = (ready_at - now).as_millis() as u64,
                    "spacing outbound call"
                );
                sleep_until(ready_at).await;
            }
        }

        state.last_call = Some(Instant::now());
        state.calls_in_window += 1;
        Admission::Granted
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::task::JoinSet;
    use tokio::time::Instant;

    use super::{Admission, RequestThrottle, ThrottleConfig, ThrottlePolicy};

    fn config(spacing_ms: u64, ceiling: u32, policy: ThrottlePolicy) -> ThrottleConfig {
        ThrottleConfig {
            window: Duration::from_secs(60),
            min_spacing: Duration::from_millis(spacing_ms),
            max_calls_per_window: ceiling,
            policy,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_calls_are_spaced() {
        let throttle = RequestThrottle::new(config(1_000, 50, ThrottlePolicy::Wait));

        let start = Instant::now();
        assert_eq!(throttle.acquire().await, Admission::Granted);
        let first = Instant::now();
        assert_eq!(first - start, Duration::ZERO);

        assert_eq!(throttle.acquire().await, Admission::Granted);
        assert!(Instant::now() - first >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn spacing_counts_time_already_passed() {
        let throttle = RequestThrottle::new(config(1_000, 50, ThrottlePolicy::Wait));
        throttle.acquire().await;

        tokio::time::advance(Duration::from_millis(700)).await;
        let before = Instant::now();
        throttle.acquire().await;

        let waited = Instant::now() - before;
        assert!(waited >= Duration::from_millis(300));
        assert!(waited < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_policy_sleeps_until_window_rolls_over() {
        let throttle = RequestThrottle::new(config(0, 3, ThrottlePolicy::Wait));
        let start = Instant::now();

        for _ in 0..3 {
            assert_eq!(throttle.acquire().await, Admission::Granted);
        }
        assert!(Instant::now() - start < Duration::from_secs(1));

        assert_eq!(throttle.acquire().await, Admission::Granted);
        assert!(Instant::now() - start >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_policy_denies_at_ceiling() {
        let throttle = RequestThrottle::new(config(0, 2, ThrottlePolicy::Fallback));

        assert_eq!(throttle.acquire().await, Admission::Granted);
        assert_eq!(throttle.acquire().await, Admission::Granted);
        assert_eq!(throttle.acquire().await, Admission::Denied);
        assert_eq!(throttle.acquire().await, Admission::Denied);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(throttle.acquire().await, Admission::Granted);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_never_exceed_ceiling() {
        let throttle = Arc::new(RequestThrottle::new(config(0, 3, ThrottlePolicy::Fallback)));
        let mut tasks = JoinSet::new();
        for _ in 0..10 {
            let throttle = Arc::clone(&throttle);
            tasks.spawn(async move { throttle.acquire().await });
        }

        let mut granted = 0;
        while let Some(result) = tasks.join_next().await {
            if result.unwrap() == Admission::Granted {
                granted += 1;
            }
        }
        assert_eq!(granted, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_waiters_spill_into_next_window() {
        let throttle = Arc::new(RequestThrottle::new(config(0, 3, ThrottlePolicy::Wait)));
        let start = Instant::now();
        let mut tasks = JoinSet::new();
        for _ in 0..7 {
            let throttle = Arc::clone(&throttle);
            tasks.spawn(async move {
                throttle.acquire().await;
                Instant::now() - start
            });
        }

        let mut offsets = Vec::new();
        while let Some(result) = tasks.join_next().await {
            offsets.push(result.unwrap());
        }

        let window = Duration::from_secs(60);
        let in_first = offsets.iter().filter(|o| **o < window).count();
        let in_second = offsets
            .iter()
            .filter(|o| **o >= window && **o < window * 2)
            .count();
        assert_eq!(in_first, 3);
        assert_eq!(in_second, 3);
        assert_eq!(offsets.len(), 7);
    }

    #[test]
    fn zero_ceiling_is_clamped() {
        let throttle = RequestThrottle::new(config(0, 0, ThrottlePolicy::Wait));
        assert_eq!(throttle.config().max_calls_per_window, 1);
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(ThrottlePolicy::parse(" Wait "), Some(ThrottlePolicy::Wait));
        assert_eq!(ThrottlePolicy::parse("fallback"), Some(ThrottlePolicy::Fallback));
        assert_eq!(ThrottlePolicy::parse("drop"), None);
    }
}
