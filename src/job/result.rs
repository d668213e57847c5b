// src/job/result.rs

use serde::Serialize;
use serde_json::{Map, Value};

use crate::actions::ActionOutcome;

/// Response fields the coordinator receives.
pub const REPORTED_FIELDS: &[&str] = &["data", "headers", "status"];

/// What is posted back for one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Projection of the action response onto [`REPORTED_FIELDS`]. An
    /// outcome without a response projects to an empty object.
    pub response: Value,
    /// Milliseconds taken by the first reported action.
    pub execution_time: Option<f64>,
}

impl ExecutionResult {
    pub fn from_outcome(outcome: &ActionOutcome) -> Self {
        Self {
            response: project(outcome.response.as_ref()),
            execution_time: outcome.reports.first().map(|r| r.time_millis()),
        }
    }
}

/// Keep only the reportable fields of a response.
pub fn project(response: Option<&Value>) -> Value {
    let mut out = Map::new();
    if let Some(Value::Object(fields)) = response {
        for key in REPORTED_FIELDS {
            if let Some(value) = fields.get(*key) {
                out.insert((*key).to_string(), value.clone());
            }
        }
    }
    Value::Object(out)
}
