// src/actions/report.rs

//! Structured results of evaluating an action.

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use serde_json::Value;

/// One line of an action's outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    pub action: String,
    pub success: bool,
    pub short_summary: String,
    pub long_summary: Option<String>,
    /// Wall time spent in the action, serialised as fractional milliseconds.
    #[serde(serialize_with = "serialize_millis")]
    pub time: Duration,
}

impl ActionReport {
    pub fn success(action: &str, short_summary: impl Into<String>, time: Duration) -> Self {
        Self {
            action: action.to_string(),
            success: true,
            short_summary: short_summary.into(),
            long_summary: None,
            time,
        }
    }

    pub fn failure(action: &str, short_summary: impl Into<String>, time: Duration) -> Self {
        Self {
            action: action.to_string(),
            success: false,
            short_summary: short_summary.into(),
            long_summary: None,
            time,
        }
    }

    pub fn with_long_summary(mut self, long_summary: impl Into<String>) -> Self {
        self.long_summary = Some(long_summary.into());
        self
    }

    pub fn time_millis(&self) -> f64 {
        millis(self.time)
    }
}

pub fn millis(time: Duration) -> f64 {
    time.as_nanos() as f64 / 1_000_000.0
}

fn serialize_millis<S: Serializer>(time: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(millis(*time))
}

/// Everything an action evaluation produced.
///
/// `reports` is never empty: every evaluation path, including every failure
/// path, pushes at least one report. `response` is only set by actions that
/// talk to something (HTTP, database).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    #[serde(rename = "actionReports")]
    pub reports: Vec<ActionReport>,
    pub response: Option<Value>,
}

impl ActionOutcome {
    pub fn single(report: ActionReport) -> Self {
        Self {
            reports: vec![report],
            response: None,
        }
    }

    pub fn with_response(report: ActionReport, response: Value) -> Self {
        Self {
            reports: vec![report],
            response: Some(response),
        }
    }

    /// True if every report succeeded.
    pub fn succeeded(&self) -> bool {
        self.reports.iter().all(|r| r.success)
    }

    /// Time of the first report, which is what the coordinator receives as
    /// the job's execution time.
    pub fn first_time(&self) -> Option<Duration> {
        self.reports.first().map(|r| r.time)
    }
}

/// Stopwatch started at action entry.
///
/// Every return path reads it, so failure reports carry real timings too.
#[derive(Debug, Clone, Copy)]
pub struct Timer(Instant);

impl Timer {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}
