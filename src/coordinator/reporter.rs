// src/coordinator/reporter.rs

use std::sync::Arc;

use tracing::{debug, error};

use super::Coordinator;
use crate::job::{ExecutionResult, JobId};

/// Best-effort delivery of job results.
///
/// A failed delivery is logged and forgotten: no retry, nothing persisted.
#[derive(Clone)]
pub struct Reporter {
    coordinator: Arc<dyn Coordinator>,
}

impl Reporter {
    pub fn new(coordinator: Arc<dyn Coordinator>) -> Self {
        Self { coordinator }
    }

    /// Send `result` for `job_id`. Returns whether the coordinator accepted it.
    pub async fn send(&self, job_id: &JobId, result: &ExecutionResult) -> bool {
        match self.coordinator.send_result(job_id, result).await {
            Ok(()) => {
                debug!(%job_id, "result delivered");
                true
            }
            Err(err) => {
                error!(%job_id, error = %err, "failed to deliver result; dropping it");
                false
            }
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}
