use std::fmt::Write;

use crate::providers::WorkflowInfo;
use crate::report::DebugReport;

use super::styling::{dim, heading, highlight, link, outcome};
use super::tables::{category_cell, conclusion_cell, create_table};

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{emoji} {}", heading(title));
}

fn format_duration(seconds: i64) -> String {
    if seconds >= 60 {
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

/// Renders a human-readable debug report.
///
/// Shows an overview (run id, URL, outcome, duration), a per-job timing
/// table, one section per classified error, and the aggregated suggestion
/// list in first-seen order.
pub fn render_report(report: &DebugReport) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📊", "Run Overview");

    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        dim("Run:"),
        highlight(report.run_id),
        dim("URL:"),
        link(&report.run_url),
        dim("Outcome:"),
        outcome(&report.status, report.success),
        dim("Duration:"),
        highlight(format_duration(report.duration_seconds)),
    );

    if !report.jobs.is_empty() {
        add_section_header(&mut output, "🧱", "Jobs");
        let mut table = create_table(&["Job", "Conclusion", "Duration"]);
        for job in &report.jobs {
            table.add_row(vec![
                comfy_table::Cell::new(&job.name),
                conclusion_cell(job.conclusion.as_deref()),
                comfy_table::Cell::new(
                    job.duration_seconds
                        .map_or_else(|| "-".to_string(), format_duration),
                ),
            ]);
        }
        let _ = writeln!(output, "{table}\n");
    }

    if report.success {
        let _ = writeln!(output, "{}", outcome("✓ No failures to report", true));
        return output;
    }

    if report.errors.is_empty() {
        let _ = writeln!(
            output,
            "{}",
            highlight("Run did not succeed, but no failed steps were found to classify")
        );
        return output;
    }

    add_section_header(&mut output, "❌", "Failures");
    let mut table = create_table(&["Job", "Step", "Type", "Category", "Diagnosis"]);
    for error in &report.errors {
        table.add_row(vec![
            comfy_table::Cell::new(&error.job),
            comfy_table::Cell::new(&error.step),
            comfy_table::Cell::new(&error.error_type),
            category_cell(&error.category),
            comfy_table::Cell::new(&error.message),
        ]);
    }
    let _ = writeln!(output, "{table}\n");

    add_section_header(&mut output, "💡", "Suggestions");
    for (index, suggestion) in report.suggestions.iter().enumerate() {
        let _ = writeln!(output, "  {} {}", dim(format!("{}.", index + 1)), suggestion);
    }

    output
}

/// Prints the workflow listing as a table.
pub fn print_workflows(workflows: &[WorkflowInfo]) {
    let mut table = create_table(&["Name", "Path"]);
    for workflow in workflows {
        table.add_row(vec![workflow.name.clone(), workflow.path.clone()]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ErrorInfo, JobTiming};

    fn sample_report() -> DebugReport {
        DebugReport {
            success: false,
            run_id: 42,
            run_url: "https://ci.example/runs/42".to_string(),
            status: "failure".to_string(),
            duration_seconds: 95,
            jobs: vec![JobTiming {
                name: "build".to_string(),
                conclusion: Some("failure".to_string()),
                duration_seconds: Some(80),
                steps: vec![],
            }],
            errors: vec![ErrorInfo {
                job: "build".to_string(),
                step: "Install".to_string(),
                error_type: "missing_dependency".to_string(),
                category: "dependency".to_string(),
                message: "A required module could not be resolved at runtime".to_string(),
                suggestions: vec!["Add 'left-pad' to the dependency manifest".to_string()],
            }],
            suggestions: vec!["Add 'left-pad' to the dependency manifest".to_string()],
        }
    }

    #[test]
    fn test_render_contains_all_sections() {
        let rendered = render_report(&sample_report());
        assert!(rendered.contains("Run Overview"));
        assert!(rendered.contains("Failures"));
        assert!(rendered.contains("Suggestions"));
        assert!(rendered.contains("missing_dependency"));
        assert!(rendered.contains("left-pad"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(95), "1m 35s");
        assert_eq!(format_duration(600), "10m 00s");
    }
}
