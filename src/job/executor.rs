// src/job/executor.rs

//! Run one job end to end.
//!
//! The lifecycle is:
//! 1. build the context from the job's variables
//! 2. plan the actions
//! 3. evaluate them in order; each action's parameters are substituted
//!    once, against the context as it stands right before it runs
//! 4. project the outcome and hand it to the [`Reporter`]
//!
//! A job fails without a report only when it never gets to run: bad
//! variables, a malformed definition, an unknown action or dialect, or an
//! unresolved placeholder under the strict policy. Once actions run, every
//! outcome is reported, including failed ones and actions whose parameters
//! turned out to be unusable.

use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::plan::{self, PlannedAction};
use super::result::ExecutionResult;
use super::Job;
use crate::actions::{Action, ActionEnv, ActionOutcome, ActionReport, Timer};
use crate::context::Context;
use crate::coordinator::Reporter;
use crate::errors::JobError;
use crate::template::substitute;
use crate::types::PlaceholderPolicy;

/// What happened to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Actions ran and a result was handed to the reporter.
    Reported { delivered: bool },
    /// The job never reached its actions. Nothing was reported.
    Failed,
}

#[derive(Debug, Clone)]
pub struct JobExecutor {
    env: ActionEnv,
    policy: PlaceholderPolicy,
    reporter: Reporter,
}

impl JobExecutor {
    pub fn new(env: ActionEnv, policy: PlaceholderPolicy, reporter: Reporter) -> Self {
        Self {
            env,
            policy,
            reporter,
        }
    }

    /// Execute `job` and report its outcome. Never panics on bad input and
    /// never returns an error: a broken job only affects itself.
    pub async fn execute(&self, job: &Job) -> JobStatus {
        let outcome = match self.run(job).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(job_id = %job.id, error = %err, "job failed before reporting");
                return JobStatus::Failed;
            }
        };

        if !outcome.succeeded() {
            info!(job_id = %job.id, "job finished with failed actions");
        }

        let result = ExecutionResult::from_outcome(&outcome);
        let delivered = self.reporter.send(&job.id, &result).await;
        JobStatus::Reported { delivered }
    }

    /// Evaluate a job without reporting it.
    pub async fn run(&self, job: &Job) -> Result<ActionOutcome, JobError> {
        let mut ctx = job.build_context()?;
        let plan = plan::plan(&job.request, &ctx)?;
        debug!(job_id = %job.id, actions = plan.len(), "job planned");

        let mut reports = Vec::with_capacity(plan.len());
        let mut response = None;

        for step in &plan.actions {
            let outcome = self.run_step(step, &mut ctx).await?;
            let failed = !outcome.succeeded();

            reports.extend(outcome.reports);
            if outcome.response.is_some() {
                response = outcome.response;
            }
            if failed {
                debug!(job_id = %job.id, action = %step.label, "stopping after failed action");
                break;
            }
        }

        Ok(ActionOutcome { reports, response })
    }

    async fn run_step(
        &self,
        step: &PlannedAction,
        ctx: &mut Context,
    ) -> Result<ActionOutcome, JobError> {
        let timer = Timer::start();

        let parameters = substitute(&step.parameters, ctx, self.policy)?;
        let action = match Action::build(&step.kind, &parameters) {
            Ok(action) => action,
            Err(err) => {
                debug!(action = %step.label, error = %err, "action parameters rejected");
                return Ok(ActionOutcome::single(
                    ActionReport::failure(
                        &step.label,
                        "Invalid action parameters",
                        timer.elapsed(),
                    )
                    .with_long_summary(err.to_string()),
                ));
            }
        };

        let name = action.name();
        match timeout(self.env.action_timeout, action.evaluate(ctx, &self.env)).await {
            Ok(outcome) => Ok(outcome),
            Err(_) => Ok(ActionOutcome::single(ActionReport::failure(
                &name,
                format!(
                    "Timed out after {} ms",
                    self.env.action_timeout.as_millis()
                ),
                timer.elapsed(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::{Coordinator, CoordinatorFuture};
    use crate::job::JobId;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<(JobId, ExecutionResult)>>,
    }

    impl Coordinator for Recording {
        fn fetch_jobs(&self, _amount: usize) -> CoordinatorFuture<'_, Vec<Job>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn send_result<'a>(
            &'a self,
            job_id: &'a JobId,
            result: &'a ExecutionResult,
        ) -> CoordinatorFuture<'a, ()> {
            self.sent
                .lock()
                .unwrap()
                .push((job_id.clone(), result.clone()));
            Box::pin(async { Ok(()) })
        }
    }

    fn executor(policy: PlaceholderPolicy) -> (JobExecutor, Arc<Recording>) {
        let recording = Arc::new(Recording::default());
        let env = ActionEnv::with_client(reqwest::Client::new(), Duration::from_secs(5));
        let reporter = Reporter::new(recording.clone());
        (JobExecutor::new(env, policy, reporter), recording)
    }

    fn job(request: Value, test_variables: Value) -> Job {
        Job {
            id: JobId::new("job-1"),
            request,
            test_variables,
            env_variables: Value::Null,
        }
    }

    #[tokio::test]
    async fn generated_values_flow_into_later_actions() {
        let (exec, _) = executor(PlaceholderPolicy::Strict);
        let j = job(
            json!({"actions": [
                {"action": "Faker.generate", "parameters": {"category": "datatype", "function": "uuid", "variable": "id"}},
                {"action": "Database.query", "parameters": {
                    "dialect": "sqlite",
                    "connection": "sqlite::memory:",
                    "query": "SELECT '{{id}}' AS id"
                }}
            ]}),
            Value::Null,
        );

        let outcome = exec.run(&j).await.unwrap();
        assert!(outcome.succeeded());
        assert_eq!(outcome.reports.len(), 2);
        let id = &outcome.response.unwrap()["data"]["rows"][0]["id"];
        assert_eq!(id.as_str().map(str::len), Some(36));
    }

    #[tokio::test]
    async fn sequence_stops_at_first_failure() {
        let (exec, recording) = executor(PlaceholderPolicy::Lenient);
        let j = job(
            json!({"actions": [
                {"action": "Faker.generate", "parameters": {"category": "nope", "function": "x"}},
                {"action": "Faker.generate", "parameters": {"category": "name", "function": "firstName"}}
            ]}),
            Value::Null,
        );

        let status = exec.execute(&j).await;
        assert_eq!(status, JobStatus::Reported { delivered: true });

        let sent = recording.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.as_str(), "job-1");
        assert_eq!(sent[0].1.response, json!({}));
        assert!(sent[0].1.execution_time.is_some());
    }

    #[tokio::test]
    async fn unknown_action_fails_without_reporting() {
        let (exec, recording) = executor(PlaceholderPolicy::Lenient);
        let j = job(json!({"actions": [{"action": "Ftp.upload"}]}), Value::Null);

        assert_eq!(exec.execute(&j).await, JobStatus::Failed);
        assert!(recording.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn strict_policy_fails_job_on_unresolved_placeholder() {
        let j = job(
            json!({"actions": [{"action": "Database.query", "parameters": {
                "dialect": "sqlite",
                "connection": "sqlite::memory:",
                "query": "SELECT '{{missing}}' AS v"
            }}]}),
            Value::Null,
        );

        let (strict, _) = executor(PlaceholderPolicy::Strict);
        assert!(matches!(strict.run(&j).await, Err(JobError::Template(_))));

        let (lenient, _) = executor(PlaceholderPolicy::Lenient);
        let outcome = lenient.run(&j).await.unwrap();
        assert!(outcome.succeeded());
        assert_eq!(
            outcome.response.unwrap()["data"]["rows"][0],
            json!({"v": "{{missing}}"})
        );
    }

    #[tokio::test]
    async fn parameters_that_stay_invalid_become_failure_report() {
        let (exec, _) = executor(PlaceholderPolicy::Lenient);
        let j = job(
            json!({"actions": [{"action": "Database.query", "parameters": {
                "dialect": "{{db}}",
                "connection": "x",
                "query": "select 1"
            }}]}),
            Value::Null,
        );

        let outcome = exec.run(&j).await.unwrap();
        assert_eq!(outcome.reports.len(), 1);
        assert!(!outcome.reports[0].success);
        assert_eq!(outcome.reports[0].action, "Database.query");
    }

    #[tokio::test]
    async fn non_text_category_is_reported_by_the_action() {
        let (exec, recording) = executor(PlaceholderPolicy::Lenient);
        let j = job(
            json!({"actions": [{"action": "Faker.generate", "parameters": {
                "category": "{{cat}}",
                "function": "firstName"
            }}]}),
            json!({"cat": 5}),
        );

        assert_eq!(exec.execute(&j).await, JobStatus::Reported { delivered: true });
        let outcome = exec.run(&j).await.unwrap();
        assert_eq!(outcome.reports[0].short_summary, "Got invalid category 5");
        assert_eq!(recording.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn request_without_url_is_reported_as_failure() {
        let (exec, recording) = executor(PlaceholderPolicy::Lenient);
        let j = job(json!({"method": "GET"}), Value::Null);

        assert_eq!(exec.execute(&j).await, JobStatus::Reported { delivered: true });

        let sent = recording.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.response, json!({}));
        assert!(sent[0].1.execution_time.is_some());
    }

    #[tokio::test]
    async fn substituted_values_are_not_expanded_again() {
        let (exec, _) = executor(PlaceholderPolicy::Lenient);
        let j = job(
            json!({"actions": [{"action": "Database.query", "parameters": {
                "dialect": "sqlite",
                "connection": "sqlite::memory:",
                "query": "SELECT '{{a}}' AS v"
            }}]}),
            json!({"a": "{{b}}", "b": "expanded"}),
        );

        let outcome = exec.run(&j).await.unwrap();
        assert_eq!(
            outcome.response.unwrap()["data"]["rows"][0],
            json!({"v": "{{b}}"})
        );
    }

    #[tokio::test]
    async fn variables_resolve_in_request_jobs() {
        let (exec, _) = executor(PlaceholderPolicy::Lenient);
        let j = job(
            json!({"method": "{{verb}}", "url": "not-a-url"}),
            json!({"verb": "DELETE"}),
        );

        let outcome = exec.run(&j).await.unwrap();
        assert_eq!(outcome.reports[0].action, "Http.delete");
        assert!(!outcome.succeeded());
        assert!(outcome.response.is_none());
    }
}
