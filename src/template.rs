// src/template.rs

//! Recursive `{{ key }}` substitution over a JSON job definition.
//!
//! Rules:
//! - A string that is exactly one placeholder is replaced by the context
//!   value itself, keeping its JSON type (`"{{n}}"` with `n = 5` gives `5`).
//! - Placeholders embedded in a longer string are rendered to text and
//!   spliced in. Strings render raw, everything else as compact JSON.
//! - Numbers, booleans, null and placeholder-free strings pass through.
//! - Objects and arrays are rebuilt; object keys are never substituted.
//!
//! The input tree is never mutated; a transformed copy is returned.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::context::Context;
use crate::errors::TemplateError;
use crate::types::PlaceholderPolicy;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("failed to compile placeholder regex")
});

/// Substitute every placeholder in `value` against `ctx`.
pub fn substitute(
    value: &Value,
    ctx: &Context,
    policy: PlaceholderPolicy,
) -> Result<Value, TemplateError> {
    match value {
        Value::String(s) => substitute_str(s, ctx, policy),
        Value::Array(items) => items
            .iter()
            .map(|item| substitute(item, ctx, policy))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, item) in map {
                out.insert(key.clone(), substitute(item, ctx, policy)?);
            }
            Ok(Value::Object(out))
        }
        scalar => Ok(scalar.clone()),
    }
}

/// True if any string in the tree contains a placeholder token.
pub fn has_placeholders(value: &Value) -> bool {
    match value {
        Value::String(s) => PLACEHOLDER_RE.is_match(s),
        Value::Array(items) => items.iter().any(has_placeholders),
        Value::Object(map) => map.values().any(has_placeholders),
        _ => false,
    }
}

fn substitute_str(s: &str, ctx: &Context, policy: PlaceholderPolicy) -> Result<Value, TemplateError> {
    let Some(caps) = PLACEHOLDER_RE.captures(s) else {
        return Ok(Value::String(s.to_owned()));
    };

    if let Some(whole) = caps.get(0) {
        if whole.start() == 0 && whole.end() == s.len() {
            return match ctx.lookup(&caps[1]) {
                Some(found) => Ok(found.clone()),
                None => unresolved(s, policy),
            };
        }
    }

    let mut missing: Option<String> = None;
    let replaced = PLACEHOLDER_RE.replace_all(s, |caps: &Captures| match ctx.lookup(&caps[1]) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => {
            missing.get_or_insert_with(|| caps[0].to_string());
            caps[0].to_string()
        }
    });

    match (policy, missing) {
        (PlaceholderPolicy::Strict, Some(token)) => Err(TemplateError::Unresolved(token)),
        _ => Ok(Value::String(replaced.into_owned())),
    }
}

fn unresolved(token: &str, policy: PlaceholderPolicy) -> Result<Value, TemplateError> {
    match policy {
        PlaceholderPolicy::Lenient => Ok(Value::String(token.to_owned())),
        PlaceholderPolicy::Strict => Err(TemplateError::Unresolved(token.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(value: Value) -> Context {
        match value {
            Value::Object(map) => Context::new(map, Map::new()),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn whole_value_placeholder_keeps_native_type() {
        let c = ctx(json!({"n": 5, "flag": false, "obj": {"a": [1, 2]}}));
        let lenient = PlaceholderPolicy::Lenient;
        assert_eq!(substitute(&json!("{{n}}"), &c, lenient).unwrap(), json!(5));
        assert_eq!(substitute(&json!("{{ flag }}"), &c, lenient).unwrap(), json!(false));
        assert_eq!(
            substitute(&json!("{{obj}}"), &c, lenient).unwrap(),
            json!({"a": [1, 2]})
        );
    }

    #[test]
    fn embedded_placeholder_yields_string() {
        let c = ctx(json!({"name": "Ann", "n": 5}));
        let out = substitute(&json!("Hello {{name}}"), &c, PlaceholderPolicy::Lenient).unwrap();
        assert_eq!(out, json!("Hello Ann"));

        let out = substitute(&json!("/items/{{n}}/{{name}}"), &c, PlaceholderPolicy::Lenient).unwrap();
        assert_eq!(out, json!("/items/5/Ann"));
    }

    #[test]
    fn keys_are_not_substituted_and_nesting_is_rebuilt() {
        let c = ctx(json!({"k": "v", "id": 7}));
        let def = json!({"{{k}}": ["{{k}}", {"id": "{{id}}"}, 3, null, true]});
        let out = substitute(&def, &c, PlaceholderPolicy::Lenient).unwrap();
        assert_eq!(out, json!({"{{k}}": ["v", {"id": 7}, 3, null, true]}));
    }

    #[test]
    fn lenient_policy_leaves_unresolved_text() {
        let c = ctx(json!({"a": 1}));
        let lenient = PlaceholderPolicy::Lenient;
        assert_eq!(substitute(&json!("{{missing}}"), &c, lenient).unwrap(), json!("{{missing}}"));
        assert_eq!(
            substitute(&json!("x={{a}} y={{missing}}"), &c, lenient).unwrap(),
            json!("x=1 y={{missing}}")
        );
    }

    #[test]
    fn strict_policy_rejects_unresolved() {
        let c = ctx(json!({"a": 1}));
        let strict = PlaceholderPolicy::Strict;
        assert_eq!(
            substitute(&json!("{{missing}}"), &c, strict),
            Err(TemplateError::Unresolved("{{missing}}".to_string()))
        );
        assert_eq!(
            substitute(&json!(["ok {{a}}", "bad {{ nope }}"]), &c, strict),
            Err(TemplateError::Unresolved("{{ nope }}".to_string()))
        );
    }

    #[test]
    fn nested_path_placeholders_resolve() {
        let c = ctx(json!({"user": {"id": 12}}));
        let out = substitute(&json!("{{user.id}}"), &c, PlaceholderPolicy::Lenient).unwrap();
        assert_eq!(out, json!(12));
    }

    #[test]
    fn input_is_left_untouched() {
        let c = ctx(json!({"a": 1}));
        let def = json!({"x": "{{a}}"});
        let before = def.clone();
        let _ = substitute(&def, &c, PlaceholderPolicy::Lenient).unwrap();
        assert_eq!(def, before);
        assert!(has_placeholders(&def));
        assert!(!has_placeholders(&json!({"x": "plain", "y": [1, "{ not one }"]})));
    }
}
