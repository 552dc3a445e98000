use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::Token;
use crate::error::{DebugError, Result};
use crate::model::{Conclusion, Job, Run, RunStatus, Step};
use crate::providers::{RunProvider, TriggeredRun, WorkflowInfo};

use super::client::GitHubClient;
use super::types::{GitHubJob, GitHubRun};

/// `RunProvider` backed by the GitHub Actions REST API.
pub struct GitHubProvider {
    /// GitHub API client
    client: Arc<GitHubClient>,
    /// Repository owner
    pub(super) owner: String,
    /// Repository name
    pub(super) repo: String,
}

impl GitHubProvider {
    /// Create a new GitHub Actions provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL
    /// * `repo_path` - Repository path in format "owner/repo"
    /// * `token` - Optional GitHub personal access token
    pub fn new(base_url: &str, repo_path: &str, token: Option<Token>) -> Result<Self> {
        let parts: Vec<&str> = repo_path.split('/').collect();
        if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
            return Err(DebugError::Config(
                "Repository path must be in format 'owner/repo'".to_string(),
            ));
        }

        let owner = parts[0].to_string();
        let repo = parts[1].to_string();

        let client = GitHubClient::new(base_url, owner.clone(), repo.clone(), token)?;

        Ok(Self {
            client: Arc::new(client),
            owner,
            repo,
        })
    }

    /// Convert a raw API run and its jobs into the core model.
    ///
    /// The conclusion is only carried over once the run is completed, so a
    /// snapshot mid-flight never reports a terminal outcome.
    fn convert_run(raw: GitHubRun, jobs: Vec<GitHubJob>) -> Run {
        let status = RunStatus::parse(&raw.status);
        let conclusion = if status == RunStatus::Completed {
            raw.conclusion.as_deref().map(Conclusion::parse)
        } else {
            None
        };

        Run {
            id: raw.id,
            run_number: raw.run_number,
            status,
            conclusion,
            url: raw.html_url,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            jobs: jobs.into_iter().map(Self::convert_job).collect(),
        }
    }

    fn convert_job(raw: GitHubJob) -> Job {
        Job {
            id: raw.id,
            name: raw.name,
            status: RunStatus::parse(&raw.status),
            conclusion: raw.conclusion.as_deref().map(Conclusion::parse),
            started_at: raw.started_at,
            completed_at: raw.completed_at,
            steps: raw
                .steps
                .into_iter()
                .map(|step| Step {
                    name: step.name,
                    number: step.number,
                    status: RunStatus::parse(&step.status),
                    conclusion: step.conclusion.as_deref().map(Conclusion::parse),
                    started_at: step.started_at,
                    completed_at: step.completed_at,
                    log: None,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl RunProvider for GitHubProvider {
    async fn trigger(
        &self,
        workflow: &str,
        branch: &str,
        inputs: &HashMap<String, String>,
    ) -> Result<TriggeredRun> {
        let dispatched_at = Utc::now();
        self.client
            .dispatch_workflow(workflow, branch, inputs)
            .await?;

        let run = self
            .client
            .resolve_dispatched_run(workflow, branch, dispatched_at)
            .await?;

        Ok(TriggeredRun {
            run_id: run.id,
            run_url: run.html_url,
        })
    }

    async fn fetch_run(&self, run_id: u64) -> Result<Run> {
        let raw = self.client.fetch_run(run_id).await?;
        let jobs = self.client.fetch_jobs(run_id).await?;
        Ok(Self::convert_run(raw, jobs))
    }

    async fn fetch_failed_step_logs(
        &self,
        _run_id: u64,
        job_id: u64,
        _step_number: u32,
    ) -> Result<String> {
        // GitHub serves logs per job; the failed job's log is what the step
        // classification runs against.
        self.client.fetch_job_logs(job_id).await
    }

    async fn list_workflows(&self) -> Result<Vec<WorkflowInfo>> {
        let workflows = self.client.list_workflows().await?;
        Ok(workflows
            .into_iter()
            .map(|workflow| WorkflowInfo {
                path: workflow.path,
                name: workflow.name,
            })
            .collect())
    }
}
