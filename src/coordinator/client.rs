// src/coordinator/client.rs

//! `reqwest` client for the coordinator's location API.
//!
//! - `GET  {base}/api/location/request?amount=N` returns `{ "requests": [...] }`
//! - `POST {base}/api/location/request/{id}` takes `{ "response", "executionTime" }`
//!
//! Every call carries the location headers and a fixed 15 second timeout.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Coordinator, CoordinatorFuture};
use crate::config::LocationCredentials;
use crate::errors::{Result, WorkerError};
use crate::job::{ExecutionResult, Job, JobId};

pub const COORDINATOR_TIMEOUT: Duration = Duration::from_secs(15);

const SECRET_HEADER: &str = "x-location-secret";
const KEY_HEADER: &str = "x-location-key";
const CONTEXT_HEADER: &str = "x-location-context";

#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    requests: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct HttpCoordinator {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl HttpCoordinator {
    pub fn new(location: &LocationCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(COORDINATOR_TIMEOUT)
            .build()?;
        Self::with_client(client, location)
    }

    pub fn with_client(client: reqwest::Client, location: &LocationCredentials) -> Result<Self> {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, SECRET_HEADER, &location.secret)?;
        insert_header(&mut headers, KEY_HEADER, &location.key)?;
        if let Some(context) = &location.context {
            insert_header(&mut headers, CONTEXT_HEADER, context)?;
        }

        Ok(Self {
            client,
            base_url: location.base_url.trim_end_matches('/').to_string(),
            headers,
        })
    }

    fn requests_url(&self) -> String {
        format!("{}/api/location/request", self.base_url)
    }

    async fn fetch(&self, amount: usize) -> Result<Vec<Job>> {
        let url = self.requests_url();
        debug!(%url, amount, "fetching pending jobs");

        let response = self
            .client
            .get(&url)
            .query(&[("amount", amount)])
            .headers(self.headers.clone())
            .timeout(COORDINATOR_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkerError::CoordinatorStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload: FetchResponse = response.json().await?;
        Ok(parse_jobs(payload.requests.unwrap_or_default()))
    }

    async fn post(&self, job_id: &JobId, result: &ExecutionResult) -> Result<()> {
        let url = format!("{}/{}", self.requests_url(), job_id);

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .timeout(COORDINATOR_TIMEOUT)
            .json(result)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkerError::CoordinatorStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

impl Coordinator for HttpCoordinator {
    fn fetch_jobs(&self, amount: usize) -> CoordinatorFuture<'_, Vec<Job>> {
        Box::pin(self.fetch(amount))
    }

    fn send_result<'a>(
        &'a self,
        job_id: &'a JobId,
        result: &'a ExecutionResult,
    ) -> CoordinatorFuture<'a, ()> {
        Box::pin(self.post(job_id, result))
    }
}

/// Entries that do not parse as a job are skipped; the rest of the batch
/// still runs.
fn parse_jobs(raw: Vec<Value>) -> Vec<Job> {
    raw.into_iter()
        .filter_map(|entry| match serde_json::from_value::<Job>(entry) {
            Ok(job) => Some(job),
            Err(err) => {
                warn!(error = %err, "skipping malformed job entry");
                None
            }
        })
        .collect()
}

fn insert_header(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| WorkerError::ConfigError(format!("invalid value for {name}: {e}")))?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}
