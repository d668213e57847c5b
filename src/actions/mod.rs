// src/actions/mod.rs

//! Executable units of work.
//!
//! Every action implements the same contract: `evaluate(context) ->
//! ActionOutcome`. Evaluation never returns an error; every failure path
//! produces a report with `success = false` instead.
//!
//! - [`http`]: one outbound HTTP request.
//! - [`generate`]: synthetic data written into the context.
//! - [`database`]: one SQL statement against a dialect-specific driver.
//! - [`report`]: `ActionReport` / `ActionOutcome`.

pub mod database;
pub mod generate;
pub mod generators;
pub mod http;
pub mod report;

use std::time::Duration;

use serde_json::Value;

use crate::context::Context;
use crate::errors::{JobError, Result};

pub use database::{DatabaseAction, Dialect};
pub use generate::GenerateAction;
pub use generators::GeneratorCatalog;
pub use http::HttpAction;
pub use report::{ActionOutcome, ActionReport, Timer};

/// Shared, read-only resources actions need.
#[derive(Debug, Clone)]
pub struct ActionEnv {
    pub http: reqwest::Client,
    pub generators: GeneratorCatalog,
    /// Upper bound for a single action evaluation.
    pub action_timeout: Duration,
}

impl ActionEnv {
    pub fn new(ignore_ssl: bool, action_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(ignore_ssl)
            .timeout(action_timeout)
            .build()?;
        Ok(Self::with_client(http, action_timeout))
    }

    pub fn with_client(http: reqwest::Client, action_timeout: Duration) -> Self {
        Self {
            http,
            generators: GeneratorCatalog::default(),
            action_timeout,
        }
    }
}

/// Action type as named in a job definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// `Http.request`, or `Http.<method>` which fixes the method.
    Http { method: Option<String> },
    /// `Faker.generate`
    Generate,
    /// `Database.query`
    Database,
}

impl ActionKind {
    pub fn parse(name: &str) -> Option<Self> {
        let (family, op) = name.split_once('.')?;
        match (family.to_lowercase().as_str(), op.to_lowercase().as_str()) {
            ("http", "request") => Some(ActionKind::Http { method: None }),
            ("http", m @ ("get" | "post" | "put" | "patch" | "delete" | "head" | "options")) => {
                Some(ActionKind::Http {
                    method: Some(m.to_uppercase()),
                })
            }
            ("faker", "generate") => Some(ActionKind::Generate),
            ("database", "query") => Some(ActionKind::Database),
            _ => None,
        }
    }
}

/// Closed set of action variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Http(HttpAction),
    Generate(GenerateAction),
    Database(DatabaseAction),
}

impl Action {
    /// Build an action of `kind` from already-substituted parameters.
    pub fn build(kind: &ActionKind, parameters: &Value) -> std::result::Result<Self, JobError> {
        match kind {
            ActionKind::Http { method } => {
                let mut params = parameters.clone();
                if let (Some(method), Value::Object(map)) = (method, &mut params) {
                    map.entry("method")
                        .or_insert_with(|| Value::String(method.clone()));
                }
                serde_json::from_value(params)
                    .map(Action::Http)
                    .map_err(|e| invalid("Http.request", e))
            }
            ActionKind::Generate => {
                let params = match parameters {
                    Value::Null => Value::Object(Default::default()),
                    other => other.clone(),
                };
                serde_json::from_value(params)
                    .map(Action::Generate)
                    .map_err(|e| invalid(generate::ACTION_NAME, e))
            }
            ActionKind::Database => DatabaseAction::from_parameters(parameters).map(Action::Database),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Action::Http(a) => a.action_name(),
            Action::Generate(_) => generate::ACTION_NAME.to_string(),
            Action::Database(_) => database::ACTION_NAME.to_string(),
        }
    }

    pub async fn evaluate(&self, ctx: &mut Context, env: &ActionEnv) -> ActionOutcome {
        match self {
            Action::Http(a) => a.evaluate(env).await,
            Action::Generate(a) => a.evaluate(ctx, &env.generators),
            Action::Database(a) => a.evaluate().await,
        }
    }
}

fn invalid(action: &str, err: serde_json::Error) -> JobError {
    JobError::InvalidParameters {
        action: action.to_string(),
        message: err.to_string(),
    }
}
