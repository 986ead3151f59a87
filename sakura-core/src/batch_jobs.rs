use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// At most one bulk nickname job per guild, each cancellable from another
/// command.
#[derive(Clone, Debug, Default)]
pub struct BatchJobs {
    running: Arc<Mutex<HashMap<u64, CancellationToken>>>,
}

/// Registration of a running job. Dropping it frees the guild's slot.
#[derive(Debug)]
pub struct BatchGuard {
    jobs: BatchJobs,
    guild_id: u64,
    token: CancellationToken,
}

impl BatchJobs {
    /// Claim the guild's slot, or `None` if a job is already running there.
    pub fn start(&self, guild_id: u64) -> Option<BatchGuard> {
        let mut running = self.running.lock();
        if running.contains_key(&guild_id) {
            return None;
        }

        let token = CancellationToken::new();
        running.insert(guild_id, token.clone());

        Some(BatchGuard {
            jobs: self.clone(),
            guild_id,
            token,
        })
    }

    /// Signal the guild's running job to stop. Returns false when idle.
    pub fn cancel(&self, guild_id: u64) -> bool {
        match self.running.lock().get(&guild_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, guild_id: u64) -> bool {
        self.running.lock().contains_key(&guild_id)
    }
}

impl BatchGuard {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        self.jobs.running.lock().remove(&self.guild_id);
    }
}

#[cfg(test)]
mod tests {
    use super::BatchJobs;

    #[test]
    fn one_job_per_guild() {
        let jobs = BatchJobs::default();
        let guard = jobs.start(1).expect("first job starts");

        assert!(jobs.start(1).is_none());
        assert!(jobs.start(2).is_some());
        assert!(jobs.is_running(1));

        drop(guard);
        assert!(!jobs.is_running(1));
        assert!(jobs.start(1).is_some());
    }

    #[test]
    fn cancel_reaches_running_job() {
        let jobs = BatchJobs::default();
        assert!(!jobs.cancel(7));

        let guard = jobs.start(7).expect("job starts");
        assert!(!guard.token().is_cancelled());
        assert!(jobs.cancel(7));
        assert!(guard.token().is_cancelled());
    }
}
