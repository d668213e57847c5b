// src/job/plan.rs

//! Turn a job definition into an ordered list of actions.
//!
//! Two definition shapes are accepted:
//!
//! ```json
//! { "method": "GET", "url": "https://api.example.com/users" }
//! ```
//!
//! is a request job: one HTTP action built from the whole object, and
//!
//! ```json
//! { "actions": [
//!     { "action": "Faker.generate", "parameters": { "category": "internet", "function": "email", "variable": "mail" } },
//!     { "action": "Http.post", "parameters": { "url": "https://api.example.com/users", "data": { "email": "{{mail}}" } } }
//! ] }
//! ```
//!
//! is a test job: a sequence evaluated in order against one context.
//!
//! Planning keeps each action's parameters exactly as written. They are
//! substituted once, right before the action runs, so values produced by
//! earlier actions resolve and values that merely look like placeholders are
//! never expanded twice.
//!
//! Only two things fail the job here: an unknown action name, and a dialect
//! that resolves against the initial context but names no known database.
//! Anything else wrong with the parameters surfaces as a failure report of
//! that action.

use serde_json::Value;

use crate::actions::{ActionKind, database};
use crate::context::Context;
use crate::errors::JobError;
use crate::template::{has_placeholders, substitute};
use crate::types::PlaceholderPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedAction {
    /// The action name as written in the definition.
    pub label: String,
    pub kind: ActionKind,
    /// Parameters before substitution.
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobPlan {
    pub actions: Vec<PlannedAction>,
}

impl JobPlan {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Plan a job definition against the context it starts with.
pub fn plan(definition: &Value, ctx: &Context) -> Result<JobPlan, JobError> {
    let Value::Object(map) = definition else {
        return Err(JobError::InvalidJob(
            "job definition must be a JSON object".to_string(),
        ));
    };

    let Some(steps) = map.get("actions") else {
        return Ok(JobPlan {
            actions: vec![PlannedAction {
                label: "Http.request".to_string(),
                kind: ActionKind::Http { method: None },
                parameters: definition.clone(),
            }],
        });
    };

    let Value::Array(steps) = steps else {
        return Err(JobError::InvalidJob("`actions` must be an array".to_string()));
    };
    if steps.is_empty() {
        return Err(JobError::InvalidJob("`actions` is empty".to_string()));
    }

    let mut actions = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let name = step.get("action").ok_or_else(|| {
            JobError::InvalidJob(format!("action #{index} has no `action` name"))
        })?;
        let label = match substitute(name, ctx, PlaceholderPolicy::Lenient)? {
            Value::String(s) => s,
            other => {
                return Err(JobError::InvalidJob(format!(
                    "action #{index} has a non-text name {other}"
                )));
            }
        };
        let kind =
            ActionKind::parse(&label).ok_or_else(|| JobError::UnknownAction(label.clone()))?;
        let parameters = step.get("parameters").cloned().unwrap_or(Value::Null);
        if kind == ActionKind::Database {
            check_dialect(&parameters, ctx)?;
        }
        actions.push(PlannedAction {
            label,
            kind,
            parameters,
        });
    }

    Ok(JobPlan { actions })
}

/// Reject a dialect that is already known and unsupported. Dialects that
/// still hold placeholders, or are not text at all, are left to the action.
fn check_dialect(parameters: &Value, ctx: &Context) -> Result<(), JobError> {
    let Some(raw) = parameters.get("dialect") else {
        return Ok(());
    };
    let resolved = substitute(raw, ctx, PlaceholderPolicy::Lenient)?;
    if has_placeholders(&resolved) {
        return Ok(());
    }
    match resolved {
        Value::String(dialect) => database::registry::resolve(&dialect)
            .map(|_| ())
            .ok_or(JobError::UnknownDialect(dialect)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan_empty(definition: Value) -> Result<JobPlan, JobError> {
        plan(&definition, &Context::default())
    }

    #[test]
    fn plain_object_is_a_single_http_action() {
        let p = plan_empty(json!({"method": "POST", "url": "http://x"})).unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.actions[0].kind, ActionKind::Http { method: None });
        assert_eq!(p.actions[0].parameters["url"], json!("http://x"));
    }

    #[test]
    fn action_list_keeps_order_and_raw_parameters() {
        let p = plan_empty(json!({"actions": [
            {"action": "Faker.generate", "parameters": {"category": "name", "function": "firstName", "variable": "n"}},
            {"action": "Http.get", "parameters": {"url": "http://x/{{n}}"}}
        ]}))
        .unwrap();
        let labels: Vec<_> = p.actions.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Faker.generate", "Http.get"]);
        assert_eq!(p.actions[1].parameters["url"], json!("http://x/{{n}}"));
    }

    #[test]
    fn unknown_action_fails_eagerly() {
        let err = plan_empty(json!({"actions": [{"action": "Ftp.upload"}]})).unwrap_err();
        assert!(matches!(err, JobError::UnknownAction(name) if name == "Ftp.upload"));
    }

    #[test]
    fn unknown_dialect_fails_eagerly() {
        let err = plan_empty(json!({"actions": [{
            "action": "Database.query",
            "parameters": {"dialect": "oracle", "connection": "x", "query": "select 1"}
        }]}))
        .unwrap_err();
        assert!(matches!(err, JobError::UnknownDialect(_)));
    }

    #[test]
    fn dialect_from_initial_context_is_checked() {
        let mut ctx = Context::default();
        ctx.set("db", json!("oracle"));
        let err = plan(
            &json!({"actions": [{
                "action": "Database.query",
                "parameters": {"dialect": "{{db}}", "connection": "x", "query": "select 1"}
            }]}),
            &ctx,
        )
        .unwrap_err();
        assert!(matches!(err, JobError::UnknownDialect(d) if d == "oracle"));
    }

    #[test]
    fn unresolved_dialect_is_left_to_the_action() {
        let p = plan_empty(json!({"actions": [{
            "action": "Database.query",
            "parameters": {"dialect": "{{db}}", "connection": "x", "query": "select 1"}
        }]}))
        .unwrap();
        assert_eq!(p.actions[0].parameters["dialect"], json!("{{db}}"));
    }

    #[test]
    fn bad_parameters_do_not_fail_planning() {
        assert!(plan_empty(json!({"method": "GET"})).is_ok());
        assert!(
            plan_empty(json!({"actions": [
                {"action": "Faker.generate", "parameters": {"category": 5}}
            ]}))
            .is_ok()
        );
    }

    #[test]
    fn malformed_definitions_are_rejected() {
        assert!(matches!(plan_empty(json!("GET /")), Err(JobError::InvalidJob(_))));
        assert!(matches!(plan_empty(json!({"actions": {}})), Err(JobError::InvalidJob(_))));
        assert!(matches!(plan_empty(json!({"actions": []})), Err(JobError::InvalidJob(_))));
        assert!(matches!(plan_empty(json!({"actions": [{}]})), Err(JobError::InvalidJob(_))));
        assert!(matches!(
            plan_empty(json!({"actions": [{"action": 7}]})),
            Err(JobError::InvalidJob(_))
        ));
    }
}
