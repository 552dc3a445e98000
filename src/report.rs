use indexmap::IndexSet;
use serde::Serialize;

use crate::model::Run;

/// Diagnosis for one failed step.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub job: String,
    pub step: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub category: String,
    pub message: String,
    /// Ordered, per-entry deduplicated remediation suggestions
    pub suggestions: Vec<String>,
}

/// Duration snapshot for one step in the final report.
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub number: u32,
    pub conclusion: Option<String>,
    pub duration_seconds: Option<i64>,
}

/// Duration snapshot for one job and its steps.
#[derive(Debug, Clone, Serialize)]
pub struct JobTiming {
    pub name: String,
    pub conclusion: Option<String>,
    pub duration_seconds: Option<i64>,
    pub steps: Vec<StepTiming>,
}

/// Final artifact of a debug session.
///
/// Built once after monitoring finishes and never mutated afterwards. The
/// `suggestions` list aggregates every entry's suggestions with duplicates
/// removed, preserving first-seen order across the whole run.
#[derive(Debug, Serialize)]
pub struct DebugReport {
    pub success: bool,
    pub run_id: u64,
    pub run_url: String,
    pub status: String,
    pub duration_seconds: i64,
    pub jobs: Vec<JobTiming>,
    pub errors: Vec<ErrorInfo>,
    pub suggestions: Vec<String>,
}

impl DebugReport {
    /// Assemble a report from a completed run snapshot and its diagnoses.
    pub fn from_run(run: &Run, errors: Vec<ErrorInfo>) -> Self {
        let success = run
            .conclusion
            .as_ref()
            .is_some_and(crate::model::Conclusion::is_success);

        let status = run
            .conclusion
            .as_ref()
            .map_or_else(|| run.status.to_string(), ToString::to_string);

        let jobs = run
            .jobs
            .iter()
            .map(|job| JobTiming {
                name: job.name.clone(),
                conclusion: job.conclusion.as_ref().map(ToString::to_string),
                duration_seconds: job.duration_seconds(),
                steps: job
                    .steps
                    .iter()
                    .map(|step| StepTiming {
                        name: step.name.clone(),
                        number: step.number,
                        conclusion: step.conclusion.as_ref().map(ToString::to_string),
                        duration_seconds: step.duration_seconds(),
                    })
                    .collect(),
            })
            .collect();

        let suggestions = dedup_suggestions(&errors);

        Self {
            success,
            run_id: run.id,
            run_url: run.url.clone(),
            status,
            duration_seconds: run.duration_seconds(),
            jobs,
            errors,
            suggestions,
        }
    }
}

/// Flatten suggestions across all entries, keeping only the first occurrence
/// of each string. Entries are visited in report order, suggestions in entry
/// order; the result is neither sorted nor grouped.
fn dedup_suggestions(errors: &[ErrorInfo]) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for error in errors {
        for suggestion in &error.suggestions {
            seen.insert(suggestion.as_str());
        }
    }
    seen.into_iter().map(ToString::to_string).collect()
}
