// src/errors.rs

//! Crate-wide error types.
//!
//! - [`WorkerError`] covers startup and coordinator-level failures.
//! - [`JobError`] covers everything that can go wrong while turning one
//!   fetched job into actions. It never escapes the job executor.
//! - [`TemplateError`] is only produced under the strict placeholder policy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Coordinator answered {status}: {body}")]
    CoordinatorStatus { status: u16, body: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unresolved placeholder {0}")]
    Unresolved(String),
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error("invalid job: {0}")]
    InvalidJob(String),

    #[error("{scope} variables must be an object, got {found}")]
    InvalidVariables { scope: &'static str, found: String },

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unknown database dialect '{0}'")]
    UnknownDialect(String),

    #[error("invalid parameters for {action}: {message}")]
    InvalidParameters { action: String, message: String },

    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WorkerError>;
