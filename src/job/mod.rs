// src/job/mod.rs

//! Jobs fetched from the coordinator and how they are executed.
//!
//! - [`plan`] turns a job definition into an ordered list of actions.
//! - [`executor`] runs one job end to end and hands the result to the
//!   reporter.
//! - [`result`] is the projected value sent back to the coordinator.

pub mod executor;
pub mod plan;
pub mod result;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::context::Context;
use crate::errors::JobError;

pub use executor::{JobExecutor, JobStatus};
pub use plan::{JobPlan, PlannedAction};
pub use result::ExecutionResult;

/// Identifier the coordinator uses to match a result to its job.
///
/// Accepted as either a JSON string or number, always handled as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => JobId(s),
            RawId::Number(n) => JobId(n.to_string()),
        })
    }
}

impl Serialize for JobId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One pending "test" or "request" job as served by the coordinator.
///
/// `request` is the job definition: either an HTTP request description or
/// an object with an `actions` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub request: Value,
    #[serde(default)]
    pub test_variables: Value,
    #[serde(default)]
    pub env_variables: Value,
}

impl Job {
    /// Build the job's context: test variables first, environment
    /// variables on top.
    pub fn build_context(&self) -> Result<Context, JobError> {
        let test_vars = variables("test", &self.test_variables)?;
        let env_vars = variables("environment", &self.env_variables)?;
        Ok(Context::new(test_vars, env_vars))
    }
}

fn variables(scope: &'static str, value: &Value) -> Result<Map<String, Value>, JobError> {
    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        other => Err(JobError::InvalidVariables {
            scope,
            found: kind_of(other).to_string(),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
