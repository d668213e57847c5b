// src/config/validate.rs

use std::time::Duration;

use reqwest::Url;

use crate::config::model::{
    DEFAULT_ACTION_TIMEOUT_MS, DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, LocationCredentials,
    RawWorkerConfig, WorkerConfig,
};
use crate::engine::SchedulePolicy;
use crate::errors::{Result, WorkerError};

impl TryFrom<RawWorkerConfig> for WorkerConfig {
    type Error = WorkerError;

    fn try_from(raw: RawWorkerConfig) -> std::result::Result<Self, Self::Error> {
        let location = validate_location(&raw)?;

        let batch_size = raw.batch.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(config_error("batch size must be >= 1 (got 0)"));
        }

        if raw.max_concurrency == Some(0) {
            return Err(config_error("max concurrency must be >= 1 (got 0)"));
        }

        let action_timeout = raw.action_timeout.unwrap_or(DEFAULT_ACTION_TIMEOUT_MS);
        if action_timeout == 0 {
            return Err(config_error("action timeout must be > 0 ms"));
        }

        Ok(WorkerConfig {
            location,
            batch_size,
            schedule: validate_schedule(&raw)?,
            logging: raw.logging.unwrap_or_default(),
            ignore_ssl: raw.ignore_ssl.unwrap_or(false),
            placeholders: raw.placeholders.unwrap_or_default(),
            max_concurrency: raw.max_concurrency,
            action_timeout: Duration::from_millis(action_timeout),
        })
    }
}

fn validate_location(raw: &RawWorkerConfig) -> Result<LocationCredentials> {
    let secret = required(raw.secret.as_deref(), "location secret (--secret / LOCATION_SECRET)")?;
    let key = required(raw.key.as_deref(), "location key (--key / LOCATION_KEY)")?;

    let base_url = raw.url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
    let parsed = Url::parse(base_url)
        .map_err(|e| config_error(format!("invalid coordinator url '{base_url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(config_error(format!(
            "coordinator url must be http or https (got '{}')",
            parsed.scheme()
        )));
    }

    // "Default" is what an unset context looks like on the coordinator side.
    let context = raw
        .context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != "Default")
        .map(str::to_string);

    Ok(LocationCredentials {
        base_url: base_url.trim_end_matches('/').to_string(),
        secret,
        key,
        context,
    })
}

fn validate_schedule(raw: &RawWorkerConfig) -> Result<SchedulePolicy> {
    let Some(frequency) = raw.frequency else {
        return Ok(SchedulePolicy::Once);
    };
    if frequency == 0 {
        return Err(config_error("frequency must be >= 1 ms (got 0)"));
    }

    Ok(SchedulePolicy::Continuous {
        frequency: Duration::from_millis(frequency),
        // 0 means no budget, same as leaving it unset.
        max: raw.max.filter(|ms| *ms > 0).map(Duration::from_millis),
    })
}

fn required(value: Option<&str>, what: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(config_error(format!("missing {what}"))),
    }
}

fn config_error(message: impl Into<String>) -> WorkerError {
    WorkerError::ConfigError(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LoggingMode, PlaceholderPolicy};

    fn minimal() -> RawWorkerConfig {
        RawWorkerConfig {
            secret: Some("s3cret".to_string()),
            key: Some("loc-1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let cfg = WorkerConfig::try_from(minimal()).unwrap();
        assert_eq!(cfg.location.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.batch_size, 100);
        assert_eq!(cfg.schedule, SchedulePolicy::Once);
        assert_eq!(cfg.logging, LoggingMode::Off);
        assert_eq!(cfg.placeholders, PlaceholderPolicy::Lenient);
        assert!(!cfg.ignore_ssl);
        assert_eq!(cfg.max_concurrency, None);
        assert_eq!(cfg.action_timeout, Duration::from_secs(60));
    }

    #[test]
    fn credentials_are_required() {
        let mut raw = minimal();
        raw.secret = Some("   ".to_string());
        assert!(matches!(
            WorkerConfig::try_from(raw),
            Err(WorkerError::ConfigError(msg)) if msg.contains("secret")
        ));

        let mut raw = minimal();
        raw.key = None;
        assert!(WorkerConfig::try_from(raw).is_err());
    }

    #[test]
    fn frequency_selects_continuous_schedule() {
        let mut raw = minimal();
        raw.frequency = Some(250);
        raw.max = Some(1_000);
        let cfg = WorkerConfig::try_from(raw).unwrap();
        assert_eq!(
            cfg.schedule,
            SchedulePolicy::Continuous {
                frequency: Duration::from_millis(250),
                max: Some(Duration::from_secs(1)),
            }
        );
    }

    #[test]
    fn zero_max_means_unbounded() {
        let mut raw = minimal();
        raw.frequency = Some(100);
        raw.max = Some(0);
        let cfg = WorkerConfig::try_from(raw).unwrap();
        assert_eq!(
            cfg.schedule,
            SchedulePolicy::Continuous {
                frequency: Duration::from_millis(100),
                max: None,
            }
        );
    }

    #[test]
    fn zero_values_are_rejected() {
        for tweak in [
            (|r: &mut RawWorkerConfig| r.batch = Some(0)) as fn(&mut RawWorkerConfig),
            |r| r.frequency = Some(0),
            |r| r.max_concurrency = Some(0),
            |r| r.action_timeout = Some(0),
        ] {
            let mut raw = minimal();
            tweak(&mut raw);
            assert!(WorkerConfig::try_from(raw).is_err());
        }
    }

    #[test]
    fn url_is_normalised_and_checked() {
        let mut raw = minimal();
        raw.url = Some("http://localhost:8080/".to_string());
        let cfg = WorkerConfig::try_from(raw).unwrap();
        assert_eq!(cfg.location.base_url, "http://localhost:8080");

        let mut raw = minimal();
        raw.url = Some("ftp://files".to_string());
        assert!(WorkerConfig::try_from(raw).is_err());

        let mut raw = minimal();
        raw.url = Some("not a url".to_string());
        assert!(WorkerConfig::try_from(raw).is_err());
    }

    #[test]
    fn default_context_means_none() {
        let mut raw = minimal();
        raw.context = Some("Default".to_string());
        assert_eq!(WorkerConfig::try_from(raw).unwrap().location.context, None);

        let mut raw = minimal();
        raw.context = Some("team-a".to_string());
        assert_eq!(
            WorkerConfig::try_from(raw).unwrap().location.context.as_deref(),
            Some("team-a")
        );
    }
}
