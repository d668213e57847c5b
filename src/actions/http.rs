// src/actions/http.rs

//! HTTP action: send one request to the target API and capture the response.

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use super::ActionEnv;
use super::report::{ActionOutcome, ActionReport, Timer};

/// A fully template-resolved request description.
///
/// Unknown fields in the job definition are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HttpAction {
    #[serde(default = "default_method")]
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    /// Query-string parameters.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Request body. Strings are sent as-is, anything else as JSON.
    #[serde(default, alias = "body")]
    pub data: Option<Value>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl HttpAction {
    pub fn action_name(&self) -> String {
        format!("Http.{}", self.method.to_lowercase())
    }

    /// Send the request and report the outcome.
    ///
    /// Transport failures become a failure report with no response. Any
    /// response that arrives is returned as
    /// `{status, statusText, headers, data}`; the report succeeds for
    /// statuses below 400.
    pub async fn evaluate(&self, env: &ActionEnv) -> ActionOutcome {
        let timer = Timer::start();
        let name = self.action_name();

        let method = match Method::from_bytes(self.method.to_uppercase().as_bytes()) {
            Ok(m) => m,
            Err(_) => {
                return ActionOutcome::single(ActionReport::failure(
                    &name,
                    format!("Invalid HTTP method {}", self.method),
                    timer.elapsed(),
                ));
            }
        };

        let mut builder = env
            .http
            .request(method.clone(), &self.url)
            .timeout(env.action_timeout);

        for (key, value) in &self.headers {
            builder = builder.header(key.as_str(), value_to_text(value));
        }

        if !self.params.is_empty() {
            let query: Vec<(&str, String)> = self
                .params
                .iter()
                .map(|(k, v)| (k.as_str(), value_to_text(v)))
                .collect();
            builder = builder.query(&query);
        }

        match &self.data {
            None | Some(Value::Null) => {}
            Some(Value::String(raw)) => builder = builder.body(raw.clone()),
            Some(other) => builder = builder.json(other),
        }

        debug!(%method, url = %self.url, "sending http action request");

        let response = match builder.send().await {
            Ok(resp) => resp,
            Err(err) => {
                warn!(%method, url = %self.url, error = %err, "http action transport failure");
                return ActionOutcome::single(
                    ActionReport::failure(
                        &name,
                        format!("Request to {} failed", self.url),
                        timer.elapsed(),
                    )
                    .with_long_summary(err.to_string()),
                );
            }
        };

        let status = response.status();
        let headers = headers_to_json(response.headers());
        let text = match response.text().await {
            Ok(t) => t,
            Err(err) => {
                return ActionOutcome::single(
                    ActionReport::failure(
                        &name,
                        format!("Reading response body from {} failed", self.url),
                        timer.elapsed(),
                    )
                    .with_long_summary(err.to_string()),
                );
            }
        };
        let time = timer.elapsed();

        let data = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        let status_text = status.canonical_reason().unwrap_or_default();
        let summary = format!("{} {} returned {}", method, self.url, status.as_u16());

        let report = if status.as_u16() < 400 {
            ActionReport::success(&name, summary, time)
        } else {
            ActionReport::failure(&name, summary, time)
        };

        ActionOutcome::with_response(
            report,
            json!({
                "status": status.as_u16(),
                "statusText": status_text,
                "headers": headers,
                "data": data,
            }),
        )
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Repeated headers are joined with `", "`.
fn headers_to_json(headers: &HeaderMap) -> Value {
    let mut out = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        out.insert(name.as_str().to_string(), Value::String(joined));
    }
    Value::Object(out)
}
