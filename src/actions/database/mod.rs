// src/actions/database/mod.rs

//! `Database.query`: run one SQL statement against a dialect-specific driver.
//!
//! - [`registry`] maps dialect identifiers to [`Dialect`].
//! - [`drivers`] holds the per-dialect connect-and-query code.
//! - [`rows`] turns driver rows into JSON.

pub mod drivers;
pub mod registry;
pub mod rows;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use super::report::{ActionOutcome, ActionReport, Timer};
use crate::errors::JobError;

pub use registry::Dialect;

pub const ACTION_NAME: &str = "Database.query";

#[derive(Debug, Clone, Deserialize)]
struct DatabaseParameters {
    dialect: String,
    connection: String,
    query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseAction {
    pub dialect: Dialect,
    pub connection: String,
    pub query: String,
}

impl DatabaseAction {
    /// Build from job parameters, resolving the dialect up front.
    pub fn from_parameters(parameters: &Value) -> Result<Self, JobError> {
        let params: DatabaseParameters =
            serde_json::from_value(parameters.clone()).map_err(|e| JobError::InvalidParameters {
                action: ACTION_NAME.to_string(),
                message: e.to_string(),
            })?;

        let dialect = registry::resolve(&params.dialect)
            .ok_or_else(|| JobError::UnknownDialect(params.dialect.clone()))?;

        Ok(Self {
            dialect,
            connection: params.connection,
            query: params.query,
        })
    }

    pub async fn evaluate(&self) -> ActionOutcome {
        let timer = Timer::start();

        match drivers::fetch_rows(self.dialect, &self.connection, &self.query).await {
            Ok(rows) => {
                let count = rows.len();
                let report = ActionReport::success(
                    ACTION_NAME,
                    format!("{} query returned {count} row(s)", self.dialect),
                    timer.elapsed(),
                );
                ActionOutcome::with_response(
                    report,
                    json!({ "data": { "rows": rows, "rowCount": count } }),
                )
            }
            Err(err) => {
                warn!(dialect = %self.dialect, error = %err, "database action failed");
                ActionOutcome::single(
                    ActionReport::failure(
                        ACTION_NAME,
                        format!("{} query failed", self.dialect),
                        timer.elapsed(),
                    )
                    .with_long_summary(err.to_string()),
                )
            }
        }
    }
}
