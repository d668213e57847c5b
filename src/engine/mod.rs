// src/engine/mod.rs

//! Polling engine.
//!
//! - [`cycle`] runs one fetch-execute-report cycle over a batch of jobs.
//! - [`scheduler`] decides when cycles start: once, or on a fixed interval
//!   until a time budget runs out or a stop signal arrives.
//! - [`in_flight`] counts cycles that have started but not finished.

pub mod cycle;
pub mod in_flight;
pub mod scheduler;

use std::time::Duration;

pub use cycle::{CycleRunner, CycleStats};
pub use in_flight::{InFlight, InFlightGuard};
pub use scheduler::Scheduler;

/// When cycles run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePolicy {
    /// A single cycle, then exit.
    Once,
    /// A new cycle every `frequency`, regardless of whether earlier cycles
    /// have finished. No new cycle starts once `max` has elapsed since the
    /// scheduler started.
    Continuous {
        frequency: Duration,
        max: Option<Duration>,
    },
}

/// Totals across every cycle of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub jobs_fetched: usize,
    /// Jobs whose result was handed to the reporter.
    pub jobs_reported: usize,
    /// Subset of `jobs_reported` the coordinator accepted.
    pub jobs_delivered: usize,
    pub jobs_failed: usize,
    pub fetch_failures: u64,
    /// Cycles whose task panicked. Their jobs are not in the counts above.
    pub cycles_panicked: u64,
}

impl RunSummary {
    pub fn record(&mut self, stats: &CycleStats) {
        self.cycles += 1;
        self.jobs_fetched += stats.fetched;
        self.jobs_reported += stats.reported;
        self.jobs_delivered += stats.delivered;
        self.jobs_failed += stats.failed;
        if stats.fetch_failed {
            self.fetch_failures += 1;
        }
    }

    /// Count a cycle that panicked before producing stats.
    pub fn record_panic(&mut self) {
        self.cycles += 1;
        self.cycles_panicked += 1;
    }
}
