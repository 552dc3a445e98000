use log::debug;
use std::time::{Duration, Instant};

use crate::error::{DebugError, Result};
use crate::model::{Run, RunStatus};
use crate::providers::RunProvider;

/// Side channel for progress notifications from the poll loop.
///
/// Implementations render job/step summaries however they like; the monitor
/// itself has no output-stream dependency.
pub trait ProgressObserver: Send + Sync {
    fn on_status_change(&self, run: &Run);
}

/// Observer that discards all notifications.
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_status_change(&self, _run: &Run) {}
}

/// Polls a provider for a run until it completes or a deadline elapses.
pub struct RunMonitor<'a> {
    provider: &'a dyn RunProvider,
}

impl<'a> RunMonitor<'a> {
    pub fn new(provider: &'a dyn RunProvider) -> Self {
        Self { provider }
    }

    /// Watch a run until its status is `Completed`.
    ///
    /// Returns the final snapshot regardless of conclusion value; a failure
    /// conclusion is not a monitor-level error. Exceeding `timeout` yields
    /// `DebugError::Timeout` with the elapsed duration and leaves the remote
    /// run untouched. A timeout shorter than one `poll_interval` still
    /// performs at least one fetch; the inter-poll sleep is clamped to the
    /// remaining deadline so the call never blocks materially past it.
    ///
    /// Provider errors abort the loop without internal retry.
    pub async fn watch(
        &self,
        run_id: u64,
        poll_interval: Duration,
        timeout: Duration,
        observer: &dyn ProgressObserver,
    ) -> Result<Run> {
        if poll_interval.is_zero() {
            return Err(DebugError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }

        let started = Instant::now();
        let mut observed: Option<RunStatus> = None;

        loop {
            if started.elapsed() > timeout {
                return Err(DebugError::Timeout {
                    elapsed: started.elapsed(),
                });
            }

            let run = self.provider.fetch_run(run_id).await?;
            debug!("Run {run_id} status: {}", run.status);

            if run.status == RunStatus::Completed {
                return Ok(run);
            }

            if observed != Some(run.status) {
                observer.on_status_change(&run);
                observed = Some(run.status);
            }

            let remaining = timeout.saturating_sub(started.elapsed());
            tokio::time::sleep(poll_interval.min(remaining)).await;
        }
    }
}
