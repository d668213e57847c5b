// src/actions/generate.rs

//! `Faker.generate`: produce a synthetic value and store it in the context.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::generators::GeneratorCatalog;
use super::report::{ActionOutcome, ActionReport, Timer};
use crate::context::Context;

pub const ACTION_NAME: &str = "Faker.generate";

/// Fields are kept as raw JSON: a whole-value placeholder can leave a
/// number or boolean here, and that still has to reach the validation below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateAction {
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub function: Option<Value>,
    #[serde(default)]
    pub variable: Option<Value>,
}

impl GenerateAction {
    /// Validate, generate, store.
    ///
    /// Each validation failure returns immediately with a single failure
    /// report and leaves the context untouched.
    pub fn evaluate(&self, ctx: &mut Context, catalog: &GeneratorCatalog) -> ActionOutcome {
        let timer = Timer::start();
        let fail = |summary: String| {
            ActionOutcome::single(ActionReport::failure(ACTION_NAME, summary, timer.elapsed()))
        };

        let Some(category) = non_empty(&self.category) else {
            return fail("Category must be selected, got none".to_string());
        };
        let Some(function) = non_empty(&self.function) else {
            return fail("Function must be selected, got none".to_string());
        };
        let Some(group) = catalog.group(&category) else {
            return fail(format!("Got invalid category {category}"));
        };
        let Some(generator) = group.function(&function) else {
            return fail(format!("Got invalid function {function}"));
        };

        let value = generator(&mut rand::thread_rng());
        let summary = format!(
            "Faked {category}.{function} and got value {}",
            display_value(&value)
        );

        match non_empty(&self.variable) {
            Some(variable) => {
                debug!(%variable, %category, %function, "storing generated value in context");
                ctx.set(variable, value);
            }
            None => debug!(%category, %function, "no variable given; generated value not stored"),
        }

        ActionOutcome::single(ActionReport::success(ACTION_NAME, summary, timer.elapsed()))
    }
}

/// Text of a selector field. Null, `""`, `false` and `0` count as unset.
fn non_empty(field: &Option<Value>) -> Option<String> {
    match field.as_ref()? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(display_value(other)),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(category: Option<&str>, function: Option<&str>, variable: Option<&str>) -> GenerateAction {
        GenerateAction {
            category: category.map(Value::from),
            function: function.map(Value::from),
            variable: variable.map(Value::from),
        }
    }

    fn run(a: &GenerateAction) -> (ActionOutcome, Context) {
        let mut ctx = Context::default();
        let outcome = a.evaluate(&mut ctx, &GeneratorCatalog::default());
        (outcome, ctx)
    }

    #[test]
    fn missing_category_fails_without_touching_context() {
        let (outcome, ctx) = run(&action(None, Some("email"), Some("v")));
        assert_eq!(outcome.reports.len(), 1);
        let report = &outcome.reports[0];
        assert!(!report.success);
        assert_eq!(report.action, ACTION_NAME);
        assert_eq!(report.short_summary, "Category must be selected, got none");
        assert!(ctx.is_empty());
    }

    #[test]
    fn missing_function_fails() {
        let (outcome, ctx) = run(&action(Some("internet"), None, Some("v")));
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].short_summary, "Function must be selected, got none");
        assert!(ctx.is_empty());
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let (outcome, _) = run(&action(Some(""), Some("email"), Some("v")));
        assert_eq!(outcome.reports[0].short_summary, "Category must be selected, got none");
    }

    #[test]
    fn unknown_category_is_named() {
        let (outcome, ctx) = run(&action(Some("planets"), Some("mars"), Some("v")));
        assert!(!outcome.succeeded());
        assert_eq!(outcome.reports[0].short_summary, "Got invalid category planets");
        assert!(ctx.is_empty());
    }

    #[test]
    fn unknown_function_is_named() {
        let (outcome, ctx) = run(&action(Some("internet"), Some("telepathy"), Some("v")));
        assert!(!outcome.succeeded());
        assert_eq!(outcome.reports[0].short_summary, "Got invalid function telepathy");
        assert!(ctx.is_empty());
    }

    #[test]
    fn non_text_selectors_are_validated_as_text() {
        let numeric = GenerateAction {
            category: Some(Value::from(5)),
            function: Some(Value::from("email")),
            variable: None,
        };
        let (outcome, _) = run(&numeric);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.reports[0].short_summary, "Got invalid category 5");

        let falsy = GenerateAction {
            category: Some(Value::from(false)),
            function: Some(Value::from("email")),
            variable: None,
        };
        let (outcome, _) = run(&falsy);
        assert_eq!(outcome.reports[0].short_summary, "Category must be selected, got none");
    }

    #[test]
    fn valid_generation_stores_value_under_variable() {
        let (outcome, ctx) = run(&action(Some("internet"), Some("email"), Some("mail")));
        assert_eq!(outcome.reports.len(), 1);
        let report = &outcome.reports[0];
        assert!(report.success);
        assert!(report.short_summary.starts_with("Faked internet.email and got value "));

        let stored = ctx.get("mail").and_then(Value::as_str).unwrap();
        assert!(stored.contains('@'));
        assert!(report.short_summary.ends_with(stored));
        assert!(outcome.response.is_none());
    }

    #[test]
    fn generation_without_variable_still_succeeds() {
        let (outcome, ctx) = run(&action(Some("datatype"), Some("uuid"), None));
        assert!(outcome.succeeded());
        assert!(ctx.is_empty());
    }
}
