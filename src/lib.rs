// src/lib.rs

pub mod actions;
pub mod cli;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod engine;
pub mod errors;
pub mod job;
pub mod logging;
pub mod template;
pub mod types;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::actions::ActionEnv;
use crate::config::WorkerConfig;
use crate::coordinator::{Coordinator, HttpCoordinator, Reporter};
use crate::engine::{CycleRunner, RunSummary, Scheduler};
use crate::errors::Result;
use crate::job::JobExecutor;

/// High-level entry point used by `main.rs`.
///
/// Wires the coordinator client, job executor and scheduler together and
/// stops starting new cycles on Ctrl-C.
pub async fn run(cfg: WorkerConfig) -> Result<RunSummary> {
    let coordinator: Arc<dyn Coordinator> = Arc::new(HttpCoordinator::new(&cfg.location)?);

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, finishing running cycles");
                let _ = stop_tx.send(true);
            }
            Err(err) => warn!(error = %err, "failed to listen for Ctrl-C"),
        }
    });

    run_with(&cfg, coordinator, stop_rx).await
}

/// Run the scheduler against any coordinator until it finishes.
pub async fn run_with(
    cfg: &WorkerConfig,
    coordinator: Arc<dyn Coordinator>,
    stop: watch::Receiver<bool>,
) -> Result<RunSummary> {
    let env = ActionEnv::new(cfg.ignore_ssl, cfg.action_timeout)?;
    let reporter = Reporter::new(Arc::clone(&coordinator));
    let executor = Arc::new(JobExecutor::new(env, cfg.placeholders, reporter));

    let runner = CycleRunner::new(coordinator, executor, cfg.batch_size)
        .with_max_concurrency(cfg.max_concurrency);

    let summary = Scheduler::new(Arc::new(runner), cfg.schedule)
        .with_stop_signal(stop)
        .run()
        .await;

    Ok(summary)
}
