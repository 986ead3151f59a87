use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::error::LlmError;

/// In-process counters for outbound LLM traffic.
#[derive(Debug, Default)]
pub struct LlmStats {
    total: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    last_request_unix: AtomicU64,
    last_error: Mutex<Option<String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LlmStatsSnapshot {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub last_request_unix: Option<u64>,
    pub last_error: Option<String>,
}

impl LlmStatsSnapshot {
    /// Share of successful requests in percent; zero before the first request.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        self.succeeded as f64 / self.total as f64 * 100.0
    }
}

impl LlmStats {
    pub fn record_request(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.last_request_unix
            .store(now_unix_secs(), Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, error: &LlmError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        *self.last_error.lock() = Some(error.to_string());
    }

    pub fn snapshot(&self) -> LlmStatsSnapshot {
        let last_request_unix = self.last_request_unix.load(Ordering::Relaxed);
        LlmStatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            last_request_unix: (last_request_unix > 0).then_some(last_request_unix),
            last_error: self.last_error.lock().clone(),
        }
    }
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::LlmStats;
    use crate::error::LlmError;

    #[test]
    fn tracks_outcomes_and_last_error() {
        let stats = LlmStats::default();
        assert_eq!(stats.snapshot().success_rate(), 0.0);
        assert_eq!(stats.snapshot().last_request_unix, None);

        for _ in 0..3 {
            stats.record_request();
        }
        stats.record_success();
        stats.record_success();
        stats.record_failure(&LlmError::EmptyResponse);

        let snapshot = stats.snapshot();
        assert_eq!((snapshot.total, snapshot.succeeded, snapshot.failed), (3, 2, 1));
        assert!((snapshot.success_rate() - 66.666).abs() < 0.01);
        assert_eq!(
            snapshot.last_error.as_deref(),
            Some("provider returned an empty completion")
        );
        assert!(snapshot.last_request_unix.is_some());
    }
}
