// src/types.rs

use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// How chatty the worker is.
///
/// - `Off`: only warnings and errors.
/// - `On`: per-cycle progress.
/// - `Cli`: everything from `On`, plus debug output and a startup banner
///   with the effective settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoggingMode {
    #[default]
    Off,
    On,
    Cli,
}

impl LoggingMode {
    /// True for every mode that logs per-cycle progress.
    pub fn is_enabled(self) -> bool {
        !matches!(self, LoggingMode::Off)
    }
}

impl FromStr for LoggingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "false" => Ok(LoggingMode::Off),
            "on" | "true" => Ok(LoggingMode::On),
            "cli" => Ok(LoggingMode::Cli),
            other => Err(format!(
                "invalid logging mode: {other} (expected \"off\", \"on\" or \"cli\")"
            )),
        }
    }
}

/// What template substitution does with a `{{ key }}` whose key is not in
/// the context.
///
/// - `Lenient`: leave the placeholder text in place (default).
/// - `Strict`: fail the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderPolicy {
    #[default]
    Lenient,
    Strict,
}

impl FromStr for PlaceholderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(PlaceholderPolicy::Lenient),
            "strict" => Ok(PlaceholderPolicy::Strict),
            other => Err(format!(
                "invalid placeholder policy: {other} (expected \"lenient\" or \"strict\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_mode_parses_case_insensitively() {
        assert_eq!("CLI".parse::<LoggingMode>(), Ok(LoggingMode::Cli));
        assert_eq!(" on ".parse::<LoggingMode>(), Ok(LoggingMode::On));
        assert!("loud".parse::<LoggingMode>().is_err());
    }

    #[test]
    fn only_off_disables_progress_logging() {
        assert!(!LoggingMode::Off.is_enabled());
        assert!(LoggingMode::On.is_enabled());
        assert!(LoggingMode::Cli.is_enabled());
    }
}
