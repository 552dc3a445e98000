use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::model::{Run, RunStatus};
use crate::monitor::ProgressObserver;

use super::styling::{highlight, outcome};

/// Spinner on stderr that follows a run through the poll loop.
///
/// Clones share the same underlying bar, so the CLI can keep a handle for
/// the final message while the orchestrator owns the observer.
#[derive(Clone)]
pub struct WatchProgress {
    pb: ProgressBar,
}

impl WatchProgress {
    pub fn start(run_label: &str) -> Self {
        let pb = create_spinner(highlight(format!("Waiting for {run_label}")).to_string());
        Self { pb }
    }

    pub fn finish(&self, success: bool) {
        let message = if success {
            "Run completed successfully ✓"
        } else {
            "Run finished with failures ✗"
        };
        self.pb
            .finish_with_message(outcome(message, success).to_string());
        eprintln!();
    }
}

impl ProgressObserver for WatchProgress {
    fn on_status_change(&self, run: &Run) {
        let message = match run.status {
            RunStatus::Queued => format!("Run #{} queued", run.run_number),
            RunStatus::InProgress => format!(
                "Run #{} in progress ({}/{} jobs complete)",
                run.run_number,
                run.completed_jobs(),
                run.jobs.len()
            ),
            RunStatus::Completed => format!("Run #{} completed", run.run_number),
        };
        self.pb.set_message(highlight(message).to_string());
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
