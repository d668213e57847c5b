// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `WORKER_LOG` environment variable (e.g. "info", "debug")
//! 2. the logging mode: `off` -> warn, `on` -> info, `cli` -> debug

use tracing::info;
use tracing_subscriber::fmt;

use crate::config::WorkerConfig;
use crate::engine::SchedulePolicy;
use crate::errors::Result;
use crate::types::LoggingMode;

pub const LOG_ENV: &str = "WORKER_LOG";

/// Initialise the global logging subscriber. Output goes to stderr.
///
/// Safe to call once at startup.
pub fn init_logging(mode: LoggingMode) -> Result<()> {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| parse_level_str(&s))
        .unwrap_or_else(|| level_for_mode(mode));

    fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

/// Print the effective settings when running in `cli` mode.
pub fn log_startup(cfg: &WorkerConfig) {
    if cfg.logging != LoggingMode::Cli {
        return;
    }

    let schedule = match cfg.schedule {
        SchedulePolicy::Once => "once".to_string(),
        SchedulePolicy::Continuous { frequency, max } => match max {
            Some(max) => format!("every {frequency:?} for {max:?}"),
            None => format!("every {frequency:?}"),
        },
    };

    info!(
        url = %cfg.location.base_url,
        key = %cfg.location.key,
        secret = %cfg.location.masked_secret(),
        context = cfg.location.context.as_deref().unwrap_or("Default"),
        batch = cfg.batch_size,
        %schedule,
        placeholders = ?cfg.placeholders,
        ignore_ssl = cfg.ignore_ssl,
        max_concurrency = ?cfg.max_concurrency,
        action_timeout = ?cfg.action_timeout,
        "location worker starting"
    );
}

pub fn level_for_mode(mode: LoggingMode) -> tracing::Level {
    match mode {
        LoggingMode::Off => tracing::Level::WARN,
        LoggingMode::On => tracing::Level::INFO,
        LoggingMode::Cli => tracing::Level::DEBUG,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
