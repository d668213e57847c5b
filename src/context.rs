// src/context.rs

//! Per-job variable store.
//!
//! A [`Context`] is created fresh for every job from its test-scoped and
//! environment-scoped variables, handed by `&mut` to each action in turn,
//! and dropped once the job's result has been reported. It is never shared
//! between tasks, so there is no locking.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    data: Map<String, Value>,
}

impl Context {
    /// Merge test variables and environment variables.
    ///
    /// Environment-scoped values are applied last and win on collision.
    pub fn new(test_vars: Map<String, Value>, env_vars: Map<String, Value>) -> Self {
        let mut data = test_vars;
        data.extend(env_vars);
        Self { data }
    }

    /// Exact-key read. `None` means the key is unset.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Insert or overwrite a key.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Resolve a placeholder key.
    ///
    /// An exact key always wins, so a variable literally named `user.name`
    /// shadows the nested lookup. Otherwise the key is split on `.` and
    /// walked through nested objects (by field) and arrays (by index).
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.data.get(path) {
            return Some(value);
        }

        let mut segments = path.split('.');
        let mut current = self.data.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }
}
