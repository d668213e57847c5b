#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

pub use location_worker_test_utils::{
    FakeCoordinator, JobBuilder, WorkerConfigBuilder, init_tracing, with_timeout,
};

use location_worker::actions::ActionEnv;
use location_worker::coordinator::{Coordinator, Reporter};
use location_worker::engine::CycleRunner;
use location_worker::job::JobExecutor;
use location_worker::types::PlaceholderPolicy;

pub fn executor(coordinator: Arc<dyn Coordinator>) -> Arc<JobExecutor> {
    let env = ActionEnv::with_client(reqwest::Client::new(), Duration::from_secs(5));
    Arc::new(JobExecutor::new(
        env,
        PlaceholderPolicy::Lenient,
        Reporter::new(coordinator),
    ))
}

pub fn runner(coordinator: Arc<FakeCoordinator>, batch_size: usize) -> Arc<CycleRunner> {
    let coordinator: Arc<dyn Coordinator> = coordinator;
    let executor = executor(Arc::clone(&coordinator));
    Arc::new(CycleRunner::new(coordinator, executor, batch_size))
}

/// A job that succeeds without any network: one generated value.
pub fn generate_job(id: &str) -> location_worker::job::Job {
    JobBuilder::new(id)
        .action(
            "Faker.generate",
            serde_json::json!({"category": "name", "function": "firstName", "variable": "n"}),
        )
        .build()
}
