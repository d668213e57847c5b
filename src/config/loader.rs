// src/config/loader.rs

//! Build the effective configuration.
//!
//! Precedence, highest first:
//! 1. CLI flags, and the primary environment variables clap reads for them
//! 2. legacy environment fallbacks (`KEY`, `LOCATION`, `INTERVAL`)
//! 3. the TOML file given by `--config` / `WORKER_CONFIG`
//! 4. built-in defaults

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawWorkerConfig, WorkerConfig};
use crate::errors::{Result, WorkerError};

/// Load and validate using the process environment for fallbacks.
pub fn load(args: &CliArgs) -> Result<WorkerConfig> {
    load_with_env(args, |name| std::env::var(name).ok())
}

/// Same as [`load`], with an injectable environment lookup.
pub fn load_with_env<F>(args: &CliArgs, lookup: F) -> Result<WorkerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match &args.config {
        Some(path) => load_from_path(path)?,
        None => RawWorkerConfig::default(),
    };
    let fallbacks = fallback_env(&lookup)?;

    let merged = args.to_raw().merge_over(fallbacks).merge_over(file);
    WorkerConfig::try_from(merged)
}

/// Read a TOML configuration layer from disk. No validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWorkerConfig> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading config file");
    let contents = fs::read_to_string(path)?;
    let raw: RawWorkerConfig = toml::from_str(&contents)?;
    Ok(raw)
}

fn fallback_env<F>(lookup: &F) -> Result<RawWorkerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let frequency = get("INTERVAL")
        .map(|v| {
            v.trim().parse::<u64>().map_err(|e| {
                WorkerError::ConfigError(format!("INTERVAL must be milliseconds ('{v}'): {e}"))
            })
        })
        .transpose()?;

    Ok(RawWorkerConfig {
        secret: get("KEY"),
        key: get("LOCATION"),
        frequency,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn legacy_variables_fill_gaps() {
        let args = CliArgs::default();
        let cfg = load_with_env(
            &args,
            env(&[("KEY", "legacy-secret"), ("LOCATION", "legacy-key"), ("INTERVAL", "500")]),
        )
        .unwrap();
        assert_eq!(cfg.location.secret, "legacy-secret");
        assert_eq!(cfg.location.key, "legacy-key");
        assert!(matches!(
            cfg.schedule,
            crate::engine::SchedulePolicy::Continuous { .. }
        ));
    }

    #[test]
    fn cli_beats_legacy_variables() {
        let args = CliArgs {
            secret: Some("cli-secret".to_string()),
            key: Some("cli-key".to_string()),
            ..Default::default()
        };
        let cfg = load_with_env(&args, env(&[("KEY", "legacy"), ("LOCATION", "legacy")])).unwrap();
        assert_eq!(cfg.location.secret, "cli-secret");
        assert_eq!(cfg.location.key, "cli-key");
    }

    #[test]
    fn bad_interval_is_a_config_error() {
        let args = CliArgs {
            secret: Some("s".to_string()),
            key: Some("k".to_string()),
            ..Default::default()
        };
        let err = load_with_env(&args, env(&[("INTERVAL", "soon")])).unwrap_err();
        assert!(matches!(err, WorkerError::ConfigError(_)));
    }

    #[test]
    fn missing_credentials_fail() {
        assert!(load_with_env(&CliArgs::default(), env(&[])).is_err());
    }
}
