// src/config/model.rs

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::SchedulePolicy;
use crate::types::{LoggingMode, PlaceholderPolicy};

pub const DEFAULT_BASE_URL: &str = "https://rapidapi.com/testing";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 60_000;

/// One configuration layer before validation.
///
/// Every field is optional so layers can be stacked with
/// [`RawWorkerConfig::merge_over`]. Durations are in milliseconds.
///
/// As a TOML file:
///
/// ```toml
/// url = "https://coordinator.example.com"
/// secret = "..."
/// key = "eu-west-1"
/// frequency = 5000
/// max = 600000
/// batch = 50
/// logging = "on"
/// placeholders = "strict"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawWorkerConfig {
    pub url: Option<String>,
    pub secret: Option<String>,
    pub key: Option<String>,
    pub context: Option<String>,
    pub frequency: Option<u64>,
    pub max: Option<u64>,
    pub batch: Option<usize>,
    pub logging: Option<LoggingMode>,
    pub ignore_ssl: Option<bool>,
    pub placeholders: Option<PlaceholderPolicy>,
    pub max_concurrency: Option<usize>,
    pub action_timeout: Option<u64>,
}

impl RawWorkerConfig {
    /// Fields set in `self` win; unset ones fall through to `lower`.
    pub fn merge_over(self, lower: RawWorkerConfig) -> RawWorkerConfig {
        RawWorkerConfig {
            url: self.url.or(lower.url),
            secret: self.secret.or(lower.secret),
            key: self.key.or(lower.key),
            context: self.context.or(lower.context),
            frequency: self.frequency.or(lower.frequency),
            max: self.max.or(lower.max),
            batch: self.batch.or(lower.batch),
            logging: self.logging.or(lower.logging),
            ignore_ssl: self.ignore_ssl.or(lower.ignore_ssl),
            placeholders: self.placeholders.or(lower.placeholders),
            max_concurrency: self.max_concurrency.or(lower.max_concurrency),
            action_timeout: self.action_timeout.or(lower.action_timeout),
        }
    }
}

/// Identity of this location towards the coordinator.
#[derive(Clone, PartialEq, Eq)]
pub struct LocationCredentials {
    /// Coordinator base URL without a trailing slash.
    pub base_url: String,
    pub secret: String,
    pub key: String,
    pub context: Option<String>,
}

impl LocationCredentials {
    /// First three characters of the secret, for logs.
    pub fn masked_secret(&self) -> String {
        let visible: String = self.secret.chars().take(3).collect();
        format!("{visible}***")
    }
}

impl fmt::Debug for LocationCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationCredentials")
            .field("base_url", &self.base_url)
            .field("secret", &self.masked_secret())
            .field("key", &self.key)
            .field("context", &self.context)
            .finish()
    }
}

/// Validated configuration. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub location: LocationCredentials,
    pub batch_size: usize,
    pub schedule: SchedulePolicy,
    pub logging: LoggingMode,
    pub ignore_ssl: bool,
    pub placeholders: PlaceholderPolicy,
    pub max_concurrency: Option<usize>,
    pub action_timeout: Duration,
}
