// src/config/mod.rs

//! Worker configuration.
//!
//! - `model.rs`: the raw, all-optional layer and the validated
//!   [`WorkerConfig`].
//! - `loader.rs`: merges CLI, environment and an optional TOML file.
//! - `validate.rs`: `TryFrom<RawWorkerConfig> for WorkerConfig`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load, load_from_path, load_with_env};
pub use model::{
    DEFAULT_ACTION_TIMEOUT_MS, DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, LocationCredentials,
    RawWorkerConfig, WorkerConfig,
};
