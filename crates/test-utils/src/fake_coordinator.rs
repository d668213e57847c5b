use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use location_worker::coordinator::{Coordinator, CoordinatorFuture};
use location_worker::errors::WorkerError;
use location_worker::job::{ExecutionResult, Job, JobId};

/// A fake coordinator that:
/// - hands out scripted batches, one per fetch, then empty batches
/// - records every fetch and every reported result
/// - can delay fetches (honours paused tokio time) or fail them outright
/// - can panic while fetching, or while reporting one chosen job
#[derive(Default)]
pub struct FakeCoordinator {
    batches: Mutex<VecDeque<Vec<Job>>>,
    fetch_delay: Option<Duration>,
    fail_fetches: bool,
    panic_fetches: bool,
    fail_reports: bool,
    panic_on_report: Option<String>,
    fetches: Mutex<Vec<usize>>,
    reports: Mutex<Vec<(JobId, ExecutionResult)>>,
    active_fetches: AtomicUsize,
    max_active_fetches: AtomicUsize,
}

impl FakeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch for the next fetch that has none yet.
    pub fn with_batch(self, jobs: Vec<Job>) -> Self {
        self.batches.lock().unwrap().push_back(jobs);
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn failing_fetches(mut self) -> Self {
        self.fail_fetches = true;
        self
    }

    pub fn panicking_fetches(mut self) -> Self {
        self.panic_fetches = true;
        self
    }

    pub fn failing_reports(mut self) -> Self {
        self.fail_reports = true;
        self
    }

    /// Panic inside `send_result` for the job with this id.
    pub fn panicking_report_for(mut self, job_id: &str) -> Self {
        self.panic_on_report = Some(job_id.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    /// `amount` of every fetch so far.
    pub fn fetch_amounts(&self) -> Vec<usize> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<(JobId, ExecutionResult)> {
        self.reports.lock().unwrap().clone()
    }

    /// Reported job ids, sorted.
    pub fn reported_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .reports
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.to_string())
            .collect();
        ids.sort();
        ids
    }

    /// Highest number of fetches that were in progress at the same time.
    pub fn max_overlapping_fetches(&self) -> usize {
        self.max_active_fetches.load(Ordering::SeqCst)
    }
}

impl Coordinator for FakeCoordinator {
    fn fetch_jobs(&self, amount: usize) -> CoordinatorFuture<'_, Vec<Job>> {
        Box::pin(async move {
            self.fetches.lock().unwrap().push(amount);
            if self.panic_fetches {
                panic!("fetch {amount} blew up");
            }

            let active = self.active_fetches.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active_fetches.fetch_max(active, Ordering::SeqCst);
            if let Some(delay) = self.fetch_delay {
                tokio::time::sleep(delay).await;
            }
            self.active_fetches.fetch_sub(1, Ordering::SeqCst);

            if self.fail_fetches {
                return Err(WorkerError::CoordinatorStatus {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }

            let batch = self.batches.lock().unwrap().pop_front();
            Ok(batch.unwrap_or_default())
        })
    }

    fn send_result<'a>(
        &'a self,
        job_id: &'a JobId,
        result: &'a ExecutionResult,
    ) -> CoordinatorFuture<'a, ()> {
        Box::pin(async move {
            if self.panic_on_report.as_deref() == Some(job_id.as_str()) {
                panic!("report for job {job_id} blew up");
            }
            if self.fail_reports {
                return Err(WorkerError::CoordinatorStatus {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.reports
                .lock()
                .unwrap()
                .push((job_id.clone(), result.clone()));
            Ok(())
        })
    }
}
