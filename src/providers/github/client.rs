use chrono::{DateTime, Utc};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::auth::Token;
use crate::error::{DebugError, Result};

use super::types::{GitHubJob, GitHubRun, GitHubWorkflow};

// Dispatching a workflow returns no run id; the new run is resolved by
// polling the workflow's run list.
const RESOLVE_ATTEMPTS: u32 = 10;
const RESOLVE_DELAY_SECONDS: u64 = 2;

/// GitHub REST API client for workflow runs, jobs and logs.
#[derive(Clone)]
pub struct GitHubClient {
    /// HTTP client
    client: reqwest::Client,
    /// Base URL for the GitHub API
    base_url: String,
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `owner` - Repository owner/organization
    /// * `repo` - Repository name
    /// * `token` - Optional GitHub personal access token
    pub fn new(base_url: &str, owner: String, repo: String, token: Option<Token>) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| DebugError::Config(format!("Invalid base URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("cidebug/0.3"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|e| DebugError::Config(format!("Invalid token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DebugError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner,
            repo,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url, self.owner, self.repo, path
        )
    }

    /// Dispatch a workflow run.
    ///
    /// The endpoint responds 204 with no body; a rejection becomes a trigger
    /// error carrying the response text.
    pub async fn dispatch_workflow(
        &self,
        workflow: &str,
        branch: &str,
        inputs: &HashMap<String, String>,
    ) -> Result<()> {
        let url = self.repo_url(&format!("actions/workflows/{workflow}/dispatches"));
        let body = json!({ "ref": branch, "inputs": inputs });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(DebugError::Trigger(format!(
                "dispatch returned {status}: {message}"
            )));
        }

        Ok(())
    }

    /// Resolve the run created by a dispatch call.
    ///
    /// Polls the workflow's run list for a run on `branch` created at or
    /// after `since`, with a bounded number of attempts.
    pub async fn resolve_dispatched_run(
        &self,
        workflow: &str,
        branch: &str,
        since: DateTime<Utc>,
    ) -> Result<GitHubRun> {
        for attempt in 1..=RESOLVE_ATTEMPTS {
            if let Some(run) = self.latest_run_since(workflow, branch, since).await? {
                debug!("Resolved dispatched run {} on attempt {attempt}", run.id);
                return Ok(run);
            }
            if attempt < RESOLVE_ATTEMPTS {
                tokio::time::sleep(Duration::from_secs(RESOLVE_DELAY_SECONDS)).await;
            }
        }

        Err(DebugError::Trigger(format!(
            "dispatched run for {workflow} did not appear after {RESOLVE_ATTEMPTS} attempts"
        )))
    }

    async fn latest_run_since(
        &self,
        workflow: &str,
        branch: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<GitHubRun>> {
        let url = self.repo_url(&format!(
            "actions/workflows/{workflow}/runs?branch={branch}&per_page=10"
        ));

        let response: WorkflowRunsResponse = self.get_json(&url).await?;

        // The API returns runs newest first.
        Ok(response
            .workflow_runs
            .into_iter()
            .find(|run| run.created_at >= since))
    }

    /// Fetch the current snapshot of one run.
    pub async fn fetch_run(&self, run_id: u64) -> Result<GitHubRun> {
        let url = self.repo_url(&format!("actions/runs/{run_id}"));
        self.get_json(&url).await
    }

    /// Fetch the jobs of one run, with their steps.
    pub async fn fetch_jobs(&self, run_id: u64) -> Result<Vec<GitHubJob>> {
        let url = self.repo_url(&format!("actions/runs/{run_id}/jobs?per_page=100"));
        let response: WorkflowJobsResponse = self.get_json(&url).await?;
        Ok(response.jobs)
    }

    /// Fetch raw log text for one job.
    ///
    /// The API serves logs per job (behind a redirect, followed
    /// automatically), not per step.
    pub async fn fetch_job_logs(&self, job_id: u64) -> Result<String> {
        let url = self.repo_url(&format!("actions/jobs/{job_id}/logs"));

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(DebugError::Api(format!(
                "log request for job {job_id} returned {status}"
            )));
        }

        Ok(response.text().await?)
    }

    /// Enumerate the workflows defined in the repository.
    pub async fn list_workflows(&self) -> Result<Vec<GitHubWorkflow>> {
        let url = self.repo_url("actions/workflows?per_page=100");
        let response: WorkflowsResponse = self.get_json(&url).await?;
        Ok(response.workflows)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(DebugError::Api(format!("{url} returned {status}: {message}")));
        }

        Ok(response.json().await?)
    }
}

/// Response from the GitHub API for workflow run lists.
#[derive(Deserialize)]
struct WorkflowRunsResponse {
    workflow_runs: Vec<GitHubRun>,
}

/// Response from the GitHub API for workflow jobs.
#[derive(Deserialize)]
struct WorkflowJobsResponse {
    jobs: Vec<GitHubJob>,
}

/// Response from the GitHub API for workflow definitions.
#[derive(Deserialize)]
struct WorkflowsResponse {
    workflows: Vec<GitHubWorkflow>,
}
