mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::WatchProgress;
pub use summary::{print_workflows, render_report};

use styling::{banner, dim};

/// Prints the `cidebug` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        banner("🔧 cidebug"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("CI Workflow Debugger")
    );
}
