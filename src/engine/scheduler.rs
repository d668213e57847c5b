// src/engine/scheduler.rs

//! Cycle scheduling.
//!
//! In continuous mode the first cycle starts one period after the scheduler
//! does, and a new one starts every period after that. Cycles are spawned,
//! not awaited, so a slow cycle never delays the next tick. Before each
//! start the elapsed time is checked against the budget; once it is over,
//! or a stop signal arrives, no further cycles start and the scheduler
//! returns after the running ones finish.

use std::collections::HashMap;
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{Id, JoinError, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

use super::cycle::{CycleRunner, CycleStats};
use super::in_flight::InFlight;
use super::{RunSummary, SchedulePolicy};

pub struct Scheduler {
    runner: Arc<CycleRunner>,
    policy: SchedulePolicy,
    in_flight: InFlight,
    stop: Option<watch::Receiver<bool>>,
}

impl Scheduler {
    pub fn new(runner: Arc<CycleRunner>, policy: SchedulePolicy) -> Self {
        Self {
            runner,
            policy,
            in_flight: InFlight::new(),
            stop: None,
        }
    }

    /// Stop starting new cycles once `true` is sent on the channel.
    pub fn with_stop_signal(mut self, stop: watch::Receiver<bool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Shared handle on the in-flight counter.
    pub fn in_flight(&self) -> InFlight {
        self.in_flight.clone()
    }

    pub async fn run(self) -> RunSummary {
        let summary = match self.policy {
            SchedulePolicy::Once => {
                let _guard = self.in_flight.enter();
                let mut summary = RunSummary::default();
                summary.record(&self.runner.run_cycle(1).await);
                summary
            }
            SchedulePolicy::Continuous { frequency, max } => {
                self.run_continuous(frequency, max).await
            }
        };

        info!(
            cycles = summary.cycles,
            fetched = summary.jobs_fetched,
            reported = summary.jobs_reported,
            failed = summary.jobs_failed,
            panicked = summary.cycles_panicked,
            "scheduler finished"
        );
        summary
    }

    async fn run_continuous(&self, frequency: Duration, max: Option<Duration>) -> RunSummary {
        let start = Instant::now();
        let mut ticks = interval_at(start + frequency, frequency);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut stop = self.stop.clone();
        let mut cycles: JoinSet<CycleStats> = JoinSet::new();
        let mut cycle_numbers: HashMap<Id, u64> = HashMap::new();
        let mut summary = RunSummary::default();
        let mut next_cycle: u64 = 0;

        info!(?frequency, ?max, "continuous polling started");

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    if max.is_some_and(|budget| start.elapsed() > budget) {
                        info!(elapsed = ?start.elapsed(), "polling budget exhausted");
                        break;
                    }

                    next_cycle += 1;
                    let cycle = next_cycle;
                    let runner = Arc::clone(&self.runner);
                    let guard = self.in_flight.enter();
                    debug!(cycle, in_flight = self.in_flight.count(), "starting cycle");

                    let handle = cycles.spawn(async move {
                        let _guard = guard;
                        runner.run_cycle(cycle).await
                    });
                    cycle_numbers.insert(handle.id(), cycle);
                }
                _ = stop_requested(&mut stop) => {
                    info!("stop requested; no new cycles will start");
                    break;
                }
                Some(joined) = cycles.join_next_with_id(), if !cycles.is_empty() => {
                    absorb(&mut summary, &mut cycle_numbers, joined);
                }
            }
        }

        if !cycles.is_empty() {
            info!(in_flight = self.in_flight.count(), "waiting for running cycles");
        }
        while let Some(joined) = cycles.join_next_with_id().await {
            absorb(&mut summary, &mut cycle_numbers, joined);
        }

        summary
    }
}

fn absorb(
    summary: &mut RunSummary,
    cycle_numbers: &mut HashMap<Id, u64>,
    joined: Result<(Id, CycleStats), JoinError>,
) {
    match joined {
        Ok((id, stats)) => {
            cycle_numbers.remove(&id);
            summary.record(&stats);
        }
        Err(err) => {
            let cycle = cycle_numbers.remove(&err.id());
            error!(?cycle, error = %err, "cycle task panicked; its jobs are not counted");
            summary.record_panic();
        }
    }
}

/// Resolves when `true` is observed. Never resolves without a channel, or
/// once every sender is gone.
async fn stop_requested(stop: &mut Option<watch::Receiver<bool>>) {
    if let Some(rx) = stop {
        let closed = rx.wait_for(|stopped| *stopped).await.is_err();
        if !closed {
            return;
        }
    }
    pending::<()>().await
}
