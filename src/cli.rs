// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag also reads an environment variable. Values left unset here
//! fall through to the legacy variables and the config file, see
//! [`crate::config::loader`].

use std::path::PathBuf;

use clap::Parser;
use clap::builder::BoolishValueParser;

use crate::config::RawWorkerConfig;
use crate::types::{LoggingMode, PlaceholderPolicy};

/// Command-line arguments for `location-worker`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "location-worker",
    version,
    about = "Poll a coordinator for API test jobs, run them from this location and report the results.",
    long_about = None
)]
pub struct CliArgs {
    /// Coordinator base URL.
    #[arg(short = 'u', long, env = "BASE_URL", value_name = "URL")]
    pub url: Option<String>,

    /// Location secret.
    #[arg(short = 's', long, env = "LOCATION_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Location key.
    #[arg(short = 'k', long, env = "LOCATION_KEY")]
    pub key: Option<String>,

    /// Location context. `Default` means none.
    #[arg(short = 'c', long, env = "LOCATION_CONTEXT")]
    pub context: Option<String>,

    /// Poll every MS milliseconds. Without it a single cycle runs.
    #[arg(short = 'f', long, env = "FREQUENCY", value_name = "MS")]
    pub frequency: Option<u64>,

    /// Stop starting new cycles after MS milliseconds.
    #[arg(short = 'm', long, env = "POLLING_TIME_MAX", value_name = "MS")]
    pub max: Option<u64>,

    /// Jobs fetched per cycle (default 100).
    #[arg(short = 'b', long, env = "BATCH_SIZE", value_name = "N")]
    pub batch: Option<usize>,

    /// Logging mode.
    #[arg(short = 'l', long, env = "WORKER_LOGGING", value_enum, value_name = "MODE")]
    pub logging: Option<LoggingMode>,

    /// Accept invalid TLS certificates on target APIs.
    #[arg(
        long,
        env = "IGNORE_MISSING_SSL_CERT",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL"
    )]
    pub ignore_ssl: Option<bool>,

    /// What to do with placeholders that have no value.
    #[arg(long, env = "WORKER_PLACEHOLDERS", value_enum, value_name = "POLICY")]
    pub placeholders: Option<PlaceholderPolicy>,

    /// Maximum jobs executing at once within a cycle.
    #[arg(long, env = "WORKER_MAX_CONCURRENCY", value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Upper bound for one action, in milliseconds (default 60000).
    #[arg(long, env = "WORKER_ACTION_TIMEOUT", value_name = "MS")]
    pub action_timeout: Option<u64>,

    /// Optional TOML config file.
    #[arg(long, env = "WORKER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// The CLI layer as a raw config layer.
    pub fn to_raw(&self) -> RawWorkerConfig {
        RawWorkerConfig {
            url: self.url.clone(),
            secret: self.secret.clone(),
            key: self.key.clone(),
            context: self.context.clone(),
            frequency: self.frequency,
            max: self.max,
            batch: self.batch,
            logging: self.logging,
            ignore_ssl: self.ignore_ssl,
            placeholders: self.placeholders,
            max_concurrency: self.max_concurrency,
            action_timeout: self.action_timeout,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
