mod github;
#[cfg(test)]
pub(crate) mod mock;

pub use github::GitHubProvider;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::Result;
use crate::model::Run;

/// Identifier handed back by a successful trigger call.
#[derive(Debug, Clone)]
pub struct TriggeredRun {
    pub run_id: u64,
    pub run_url: String,
}

/// One workflow definition known to the remote provider.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowInfo {
    pub path: String,
    pub name: String,
}

/// Capability boundary to the remote CI provider.
///
/// The core consumes exactly these four operations; everything provider
/// specific (endpoints, payload shapes, auth) stays behind this trait.
#[async_trait]
pub trait RunProvider: Send + Sync {
    /// Start a new run of `workflow` on `branch` with the given inputs.
    async fn trigger(
        &self,
        workflow: &str,
        branch: &str,
        inputs: &HashMap<String, String>,
    ) -> Result<TriggeredRun>;

    /// Fetch the full current snapshot of a run, including jobs and steps.
    async fn fetch_run(&self, run_id: u64) -> Result<Run>;

    /// Fetch raw log text for one step. Only called for steps already known
    /// to have failed.
    async fn fetch_failed_step_logs(
        &self,
        run_id: u64,
        job_id: u64,
        step_number: u32,
    ) -> Result<String>;

    /// Enumerate the workflows defined in the repository.
    async fn list_workflows(&self) -> Result<Vec<WorkflowInfo>>;
}
