// src/engine/cycle.rs

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::coordinator::Coordinator;
use crate::job::{JobExecutor, JobStatus};

/// Counts for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub fetched: usize,
    pub reported: usize,
    pub delivered: usize,
    pub failed: usize,
    pub fetch_failed: bool,
}

/// Fetches one batch and executes every job in it concurrently.
pub struct CycleRunner {
    coordinator: Arc<dyn Coordinator>,
    executor: Arc<JobExecutor>,
    batch_size: usize,
    limiter: Option<Arc<Semaphore>>,
}

impl CycleRunner {
    pub fn new(
        coordinator: Arc<dyn Coordinator>,
        executor: Arc<JobExecutor>,
        batch_size: usize,
    ) -> Self {
        Self {
            coordinator,
            executor,
            batch_size,
            limiter: None,
        }
    }

    /// Cap how many jobs of a cycle execute at the same time.
    pub fn with_max_concurrency(mut self, max: Option<usize>) -> Self {
        self.limiter = max.map(|n| Arc::new(Semaphore::new(n)));
        self
    }

    /// Run one cycle. Returns once every job of the batch has finished.
    ///
    /// A failed fetch ends the cycle early; it never stops the worker.
    pub async fn run_cycle(&self, cycle: u64) -> CycleStats {
        let mut stats = CycleStats::default();

        let jobs = match self.coordinator.fetch_jobs(self.batch_size).await {
            Ok(jobs) => jobs,
            Err(err) => {
                warn!(cycle, error = %err, "failed to fetch jobs");
                stats.fetch_failed = true;
                return stats;
            }
        };

        stats.fetched = jobs.len();
        if jobs.is_empty() {
            debug!(cycle, "no pending jobs");
            return stats;
        }
        info!(cycle, jobs = jobs.len(), "executing batch");

        let mut tasks = JoinSet::new();
        for job in jobs {
            let executor = Arc::clone(&self.executor);
            let limiter = self.limiter.clone();
            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };
                executor.execute(&job).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            tally(&mut stats, cycle, joined);
        }

        debug!(
            cycle,
            reported = stats.reported,
            delivered = stats.delivered,
            failed = stats.failed,
            "cycle finished"
        );
        stats
    }
}

fn tally(stats: &mut CycleStats, cycle: u64, joined: Result<JobStatus, JoinError>) {
    match joined {
        Ok(JobStatus::Reported { delivered }) => {
            stats.reported += 1;
            if delivered {
                stats.delivered += 1;
            }
        }
        Ok(JobStatus::Failed) => stats.failed += 1,
        Err(err) => {
            error!(cycle, error = %err, "job task panicked");
            stats.failed += 1;
        }
    }
}
