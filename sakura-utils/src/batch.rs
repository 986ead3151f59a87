use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::env::{env_secs, env_usize};

pub const DEFAULT_CHUNK_SIZE: usize = 5;
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_REPORT_EVERY_CHUNKS: usize = 5;

/// Classification returned by a per-item operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemStatus {
    Success,
    Skipped,
    Failed,
}

/// Result of processing one item: a user-facing line plus its classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemOutcome {
    pub message: String,
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: ItemStatus::Success,
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: ItemStatus::Skipped,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: ItemStatus::Failed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    Running,
    Finished,
    Cancelled,
}

/// Running tally of a batch job.
///
/// `succeeded + skipped + failed == processed` holds at every report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchProgress {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub state: BatchState,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            succeeded: 0,
            skipped: 0,
            failed: 0,
            state: BatchState::Running,
        }
    }

    fn record(&mut self, status: ItemStatus) {
        self.processed += 1;
        match status {
            ItemStatus::Success => self.succeeded += 1,
            ItemStatus::Skipped => self.skipped += 1,
            ItemStatus::Failed => self.failed += 1,
        }
    }

    /// Whole-number completion percentage; an empty job counts as complete.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }

        (self.processed * 100 / self.total).min(100)
    }
}

/// Pacing knobs for a bulk operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOptions {
    pub chunk_size: usize,
    pub chunk_delay: Duration,
    /// Push a progress update after every this many chunks (the final chunk always reports).
    pub report_every: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_delay: DEFAULT_CHUNK_DELAY,
            report_every: DEFAULT_REPORT_EVERY_CHUNKS,
        }
    }
}

impl BatchOptions {
    pub fn from_env() -> Self {
        Self {
            chunk_size: env_usize("BATCH_CHUNK_SIZE", DEFAULT_CHUNK_SIZE).max(1),
            chunk_delay: env_secs("BATCH_CHUNK_DELAY_SECONDS", DEFAULT_CHUNK_DELAY),
            report_every: env_usize("BATCH_PROGRESS_EVERY_CHUNKS", DEFAULT_REPORT_EVERY_CHUNKS)
                .max(1),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_chunk_delay(mut self, chunk_delay: Duration) -> Self {
        self.chunk_delay = chunk_delay;
        self
    }
}

/// Sink for progress updates, typically a single Discord status message that
/// gets edited in place.
#[async_trait]
pub trait ProgressReporter: Send {
    async fn report(&mut self, progress: &BatchProgress);
}

#[derive(Clone, Debug)]
pub struct BatchReport {
    pub progress: BatchProgress,
    pub outcomes: Vec<ItemOutcome>,
}

/// Process `items` in order, `chunk_size` at a time, sleeping `chunk_delay`
/// between chunks.
///
/// Items inside a chunk run sequentially. An `Err` from `op` is recorded as a
/// failed item and the batch carries on. When `cancel` fires, the job stops
/// before starting its next chunk.
pub async fn run_batch<T, F, Fut, R>(
    items: Vec<T>,
    options: &BatchOptions,
    cancel: Option<&CancellationToken>,
    reporter: &mut R,
    mut op: F,
) -> BatchReport
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = anyhow::Result<ItemOutcome>>,
    R: ProgressReporter + ?Sized,
{
    let chunk_size = options.chunk_size.max(1);
    let report_every = options.report_every.max(1);
    let total = items.len();
    let total_chunks = total.div_ceil(chunk_size);

    let mut progress = BatchProgress::new(total);
    let mut outcomes = Vec::with_capacity(total);
    let mut items = items.into_iter();

    for chunk_index in 0..total_chunks {
        if chunk_index > 0 && !pause_between_chunks(options.chunk_delay, cancel).await {
            debug!(
                processed = progress.processed,
                total, "batch cancelled between chunks"
            );
            progress.state = BatchState::Cancelled;
            reporter.report(&progress).await;
            return BatchReport { progress, outcomes };
        }

        for item in items.by_ref().take(chunk_size) {
            let outcome = match op(item).await {
                Ok(outcome) => outcome,
                Err(source) => {
                    warn!(?source, index = progress.processed, "batch item failed");
                    ItemOutcome::failed(format!("Error: {source:#}"))
                }
            };

            progress.record(outcome.status);
            outcomes.push(outcome);
        }

        let is_last_chunk = chunk_index + 1 == total_chunks;
        if is_last_chunk {
            progress.state = BatchState::Finished;
        }

        if is_last_chunk || (chunk_index + 1) % report_every == 0 {
            reporter.report(&progress).await;
        }
    }

    if total_chunks == 0 {
        progress.state = BatchState::Finished;
        reporter.report(&progress).await;
    }

    BatchReport { progress, outcomes }
}

/// Sleep between chunks. Returns `false` when the job was cancelled.
async fn pause_between_chunks(delay: Duration, cancel: Option<&CancellationToken>) -> bool {
    let Some(token) = cancel else {
        tokio::time::sleep(delay).await;
        return true;
    };

    if token.is_cancelled() {
        return false;
    }

    tokio::select! {
        _ = tokio::time::sleep(delay) => {}
        _ = token.cancelled() => {}
    }

    !token.is_cancelled()
}
