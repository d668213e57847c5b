// src/coordinator/mod.rs

//! Talking to the coordinator.
//!
//! The engine only sees the [`Coordinator`] trait, so tests can swap in a
//! fake that records calls instead of doing network IO.
//!
//! - [`client`] is the production `reqwest` implementation.
//! - [`reporter`] wraps result delivery in a best-effort, log-only policy.

pub mod client;
pub mod reporter;

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::job::{ExecutionResult, Job, JobId};

pub use client::{COORDINATOR_TIMEOUT, HttpCoordinator};
pub use reporter::Reporter;

/// Boxed future returned by [`Coordinator`] methods.
pub type CoordinatorFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Source of pending jobs and sink for their results.
pub trait Coordinator: Send + Sync {
    /// Fetch up to `amount` pending jobs. An empty vector means no work.
    fn fetch_jobs(&self, amount: usize) -> CoordinatorFuture<'_, Vec<Job>>;

    /// Deliver one job's result.
    fn send_result<'a>(
        &'a self,
        job_id: &'a JobId,
        result: &'a ExecutionResult,
    ) -> CoordinatorFuture<'a, ()>;
}
