mod patterns;

pub use patterns::ErrorPattern;

use indexmap::IndexSet;

use crate::model::Step;
use crate::report::ErrorInfo;

const UNKNOWN: &str = "unknown";

/// Pattern-based failure classifier.
///
/// Holds the ordered taxonomy and diagnoses failed steps from their raw log
/// text. Classification is a pure function of its input and never fails:
/// missing information degrades to a generic "unknown" diagnosis.
pub struct ErrorClassifier {
    patterns: Vec<ErrorPattern>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorClassifier {
    pub fn new() -> Self {
        Self {
            patterns: patterns::taxonomy(),
        }
    }

    /// Diagnose a failed step.
    ///
    /// Only ever called for steps whose conclusion is failure. The log is
    /// lowercased and scanned against the taxonomy in declared order; the
    /// first matching entry wins regardless of how specific later entries
    /// are. Without a match, [`Self::heuristic_message`] extracts the most
    /// plausible error line instead.
    pub fn classify(&self, job_name: &str, step: &Step) -> ErrorInfo {
        let Some(log) = step.log.as_deref() else {
            return ErrorInfo {
                job: job_name.to_string(),
                step: step.name.clone(),
                error_type: UNKNOWN.to_string(),
                category: UNKNOWN.to_string(),
                message: "No logs were available for this step".to_string(),
                suggestions: vec![
                    "Inspect the run in the provider UI for the full log".to_string(),
                    "Re-run the job to regenerate logs".to_string(),
                ],
            };
        };

        let lowered = log.to_lowercase();

        for pattern in &self.patterns {
            if let Some(caps) = pattern.regex.captures(&lowered) {
                let capture = caps.get(1).map(|m| m.as_str());
                return ErrorInfo {
                    job: job_name.to_string(),
                    step: step.name.clone(),
                    error_type: pattern.error_type.to_string(),
                    category: pattern.category.to_string(),
                    message: pattern.description.to_string(),
                    suggestions: dedup(pattern.suggestions(capture)),
                };
            }
        }

        ErrorInfo {
            job: job_name.to_string(),
            step: step.name.clone(),
            error_type: UNKNOWN.to_string(),
            category: UNKNOWN.to_string(),
            message: Self::heuristic_message(log),
            suggestions: vec![
                "Review the step's full log output for context".to_string(),
                "Re-run the job to check whether the failure is transient".to_string(),
            ],
        }
    }

    /// Companion query mode: every taxonomy entry matching the log, in table
    /// order. The orchestrator only consumes the first match; this exists
    /// for callers that want full-coverage diagnostics of multi-cause logs.
    pub fn matching_patterns(&self, log: &str) -> Vec<&ErrorPattern> {
        let lowered = log.to_lowercase();
        self.patterns
            .iter()
            .filter(|pattern| pattern.regex.is_match(&lowered))
            .collect()
    }

    /// Fallback extraction when no taxonomy entry matches.
    ///
    /// Scans lines top-down and returns the first one that looks like an
    /// error marker, then the last non-blank line, then a generic message.
    fn heuristic_message(log: &str) -> String {
        for line in log.lines() {
            let lowered = line.to_lowercase();
            if lowered.contains("error:")
                || lowered.contains("error ")
                || lowered.contains("failed")
                || lowered.contains("fatal:")
            {
                return line.trim().to_string();
            }
        }

        log.lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map_or_else(
                || "Step failed without producing log output".to_string(),
                ToString::to_string,
            )
    }
}

fn dedup(suggestions: Vec<String>) -> Vec<String> {
    suggestions
        .into_iter()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Conclusion, RunStatus};

    fn failed_step(log: Option<&str>) -> Step {
        Step {
            name: "Run tests".to_string(),
            number: 3,
            status: RunStatus::Completed,
            conclusion: Some(Conclusion::Failure),
            started_at: None,
            completed_at: None,
            log: log.map(ToString::to_string),
        }
    }

    #[test]
    fn test_missing_log_is_unknown() {
        let classifier = ErrorClassifier::new();
        let info = classifier.classify("build", &failed_step(None));
        assert_eq!(info.error_type, "unknown");
        assert_eq!(info.category, "unknown");
        assert!(info.message.contains("No logs"));
    }

    #[test]
    fn test_first_match_wins_over_later_entries() {
        let classifier = ErrorClassifier::new();
        // Matches both the dependency entry (first) and command_not_found.
        let log = "Cannot find module 'chalk'\nnode: command not found";
        let info = classifier.classify("build", &failed_step(Some(log)));
        assert_eq!(info.error_type, "missing_dependency");
        assert_eq!(info.category, "dependency");

        let all = classifier.matching_patterns(log);
        assert!(all.len() >= 2);
        assert_eq!(all[0].error_type, "missing_dependency");
    }

    #[test]
    fn test_capture_interpolation() {
        let classifier = ErrorClassifier::new();
        let info = classifier.classify(
            "build",
            &failed_step(Some("Error: Cannot find module 'left-pad'")),
        );
        assert_eq!(info.error_type, "missing_dependency");
        assert!(info.suggestions.iter().any(|s| s.contains("left-pad")));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let classifier = ErrorClassifier::new();
        let info = classifier.classify("deploy", &failed_step(Some("PERMISSION DENIED: /usr/bin")));
        assert_eq!(info.category, "permission");
    }

    #[test]
    fn test_heuristic_picks_first_error_line() {
        let classifier = ErrorClassifier::new();
        let log = "setting up\nsomething odd: exit 1\nERROR: widget exploded\nlater noise";
        let info = classifier.classify("build", &failed_step(Some(log)));
        assert_eq!(info.error_type, "unknown");
        assert_eq!(info.message, "ERROR: widget exploded");
    }

    #[test]
    fn test_heuristic_falls_back_to_last_nonblank_line() {
        let classifier = ErrorClassifier::new();
        let log = "step one ok\nstep two ok\nexit status 2\n\n";
        let info = classifier.classify("build", &failed_step(Some(log)));
        assert_eq!(info.message, "exit status 2");
    }

    #[test]
    fn test_blank_log_gets_generic_message() {
        let classifier = ErrorClassifier::new();
        let info = classifier.classify("build", &failed_step(Some("\n   \n")));
        assert_eq!(info.error_type, "unknown");
        assert!(info.message.contains("without producing log output"));
    }

    #[test]
    fn test_entry_suggestions_are_deduplicated() {
        let deduped = dedup(vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
        ]);
        assert_eq!(deduped, vec!["a", "b"]);
    }
}
