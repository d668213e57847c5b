// src/main.rs

use location_worker::{cli, config, logging, run};
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("location-worker error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let cfg = config::load(&args)?;
    logging::init_logging(cfg.logging)?;
    logging::log_startup(&cfg);

    let summary = run(cfg).await?;
    info!(
        cycles = summary.cycles,
        reported = summary.jobs_reported,
        delivered = summary.jobs_delivered,
        failed = summary.jobs_failed,
        panicked_cycles = summary.cycles_panicked,
        "location worker finished"
    );
    Ok(())
}
