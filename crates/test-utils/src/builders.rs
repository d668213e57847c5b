#![allow(dead_code)]

use serde_json::{Map, Value, json};

use location_worker::config::{RawWorkerConfig, WorkerConfig};
use location_worker::job::{Job, JobId};
use location_worker::types::PlaceholderPolicy;

/// Builder for `Job` to simplify test setup.
pub struct JobBuilder {
    id: String,
    request: Value,
    actions: Vec<Value>,
    test_variables: Map<String, Value>,
    env_variables: Map<String, Value>,
}

impl JobBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            request: Value::Null,
            actions: Vec::new(),
            test_variables: Map::new(),
            env_variables: Map::new(),
        }
    }

    /// Use `request` as the whole job definition.
    pub fn request(mut self, request: Value) -> Self {
        self.request = request;
        self
    }

    pub fn get(self, url: &str) -> Self {
        self.request(json!({ "method": "GET", "url": url }))
    }

    /// Append one step to a test job.
    pub fn action(mut self, name: &str, parameters: Value) -> Self {
        self.actions
            .push(json!({ "action": name, "parameters": parameters }));
        self
    }

    pub fn test_var(mut self, key: &str, value: Value) -> Self {
        self.test_variables.insert(key.to_string(), value);
        self
    }

    pub fn env_var(mut self, key: &str, value: Value) -> Self {
        self.env_variables.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Job {
        let request = if self.actions.is_empty() {
            self.request
        } else {
            json!({ "actions": self.actions })
        };

        Job {
            id: JobId::new(self.id),
            request,
            test_variables: Value::Object(self.test_variables),
            env_variables: Value::Object(self.env_variables),
        }
    }
}

/// Builder for a valid `WorkerConfig`.
pub struct WorkerConfigBuilder {
    raw: RawWorkerConfig,
}

impl WorkerConfigBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawWorkerConfig {
                url: Some("http://127.0.0.1:9".to_string()),
                secret: Some("test-secret".to_string()),
                key: Some("test-location".to_string()),
                ..Default::default()
            },
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.raw.url = Some(url.to_string());
        self
    }

    pub fn frequency_ms(mut self, ms: u64) -> Self {
        self.raw.frequency = Some(ms);
        self
    }

    pub fn max_ms(mut self, ms: u64) -> Self {
        self.raw.max = Some(ms);
        self
    }

    pub fn batch(mut self, n: usize) -> Self {
        self.raw.batch = Some(n);
        self
    }

    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.raw.max_concurrency = Some(n);
        self
    }

    pub fn placeholders(mut self, policy: PlaceholderPolicy) -> Self {
        self.raw.placeholders = Some(policy);
        self
    }

    pub fn action_timeout_ms(mut self, ms: u64) -> Self {
        self.raw.action_timeout = Some(ms);
        self
    }

    pub fn raw(&self) -> RawWorkerConfig {
        self.raw.clone()
    }

    pub fn build(self) -> WorkerConfig {
        WorkerConfig::try_from(self.raw).expect("Failed to build valid config from builder")
    }
}

impl Default for WorkerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
