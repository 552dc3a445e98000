use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GitHub Actions workflow run as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRun {
    /// Unique identifier for the workflow run
    pub id: u64,
    /// Run number
    pub run_number: u64,
    /// Status of the run
    pub status: String,
    /// Conclusion of the run (success, failure, etc.)
    pub conclusion: Option<String>,
    /// Web URL of the run
    pub html_url: String,
    /// When the run was created
    pub created_at: DateTime<Utc>,
    /// When the run was last updated
    pub updated_at: DateTime<Utc>,
}

/// Job within a GitHub Actions workflow run.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubJob {
    /// Unique identifier for the job
    pub id: u64,
    /// Name of the job
    pub name: String,
    /// Status of the job
    pub status: String,
    /// Conclusion of the job
    pub conclusion: Option<String>,
    /// When the job started
    pub started_at: Option<DateTime<Utc>>,
    /// When the job completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Steps in this job
    #[serde(default)]
    pub steps: Vec<GitHubStep>,
}

/// Step within a GitHub Actions job.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubStep {
    /// Name of the step
    pub name: String,
    /// 1-based step number
    pub number: u32,
    /// Status of the step
    pub status: String,
    /// Conclusion of the step
    pub conclusion: Option<String>,
    /// When the step started
    pub started_at: Option<DateTime<Utc>>,
    /// When the step completed
    pub completed_at: Option<DateTime<Utc>>,
}

/// Workflow definition known to the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubWorkflow {
    pub id: u64,
    pub name: String,
    pub path: String,
}
