use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Lifecycle state of a run, job or step as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
}

impl RunStatus {
    /// Parse a provider status string.
    ///
    /// Unknown values map to `InProgress` so polling keeps going instead of
    /// misreporting a terminal state.
    pub fn parse(value: &str) -> Self {
        match value {
            "queued" | "waiting" | "requested" | "pending" => Self::Queued,
            "completed" => Self::Completed,
            _ => Self::InProgress,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => f.write_str("queued"),
            Self::InProgress => f.write_str("in_progress"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

/// Terminal outcome of a completed run, job or step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    Other(String),
}

impl Conclusion {
    pub fn parse(value: &str) -> Self {
        match value {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "cancelled" => Self::Cancelled,
            "skipped" => Self::Skipped,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
            Self::Other(value) => value,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Conclusion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Snapshot of one workflow run.
///
/// Re-fetched whole on every poll; a fresh job list replaces the prior one,
/// there is no incremental merge. `conclusion` is `None` until `status` is
/// `Completed`.
#[derive(Debug, Clone, Serialize)]
pub struct Run {
    pub id: u64,
    pub run_number: u64,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub jobs: Vec<Job>,
}

impl Run {
    /// Wall-clock duration between creation and the last update.
    pub fn duration_seconds(&self) -> i64 {
        (self.updated_at - self.created_at).num_seconds()
    }

    pub fn completed_jobs(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| job.status == RunStatus::Completed)
            .count()
    }
}

/// A named unit of work within a run, composed of ordered steps.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: u64,
    pub name: String,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub steps: Vec<Step>,
}

impl Job {
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some((end - start).num_seconds()),
            _ => None,
        }
    }
}

/// The smallest tracked unit of execution within a job.
///
/// `log` is populated only for failed steps, and only after the explicit
/// log-fetch phase of a debug session.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub name: String,
    /// 1-based sequence number, unique within the owning job
    pub number: u32,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
}

impl Step {
    pub fn is_failed(&self) -> bool {
        matches!(self.conclusion, Some(Conclusion::Failure))
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some((end - start).num_seconds()),
            _ => None,
        }
    }
}
