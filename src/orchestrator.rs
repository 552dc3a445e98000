use futures::future::join_all;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::classify::ErrorClassifier;
use crate::error::Result;
use crate::model::{Conclusion, Run};
use crate::monitor::{NullObserver, ProgressObserver, RunMonitor};
use crate::providers::RunProvider;
use crate::report::{DebugReport, ErrorInfo};

/// Session parameters, passed in explicitly instead of living in any
/// process-wide state.
#[derive(Debug, Clone)]
pub struct DebugOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(1800),
        }
    }
}

/// Sequences trigger → watch → collect → classify → aggregate into one
/// report.
///
/// Each `debug` call is an independent session: the orchestrator holds no
/// state beyond the provider handle, options and classifier it was built
/// with. Only trigger and monitor failures abort a session; everything
/// downstream degrades to partial or generic information.
pub struct DebugOrchestrator {
    provider: Arc<dyn RunProvider>,
    classifier: ErrorClassifier,
    options: DebugOptions,
    observer: Box<dyn ProgressObserver>,
}

impl DebugOrchestrator {
    pub fn new(provider: Arc<dyn RunProvider>, options: DebugOptions) -> Self {
        Self {
            provider,
            classifier: ErrorClassifier::new(),
            options,
            observer: Box::new(NullObserver),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run a full debug session: trigger the workflow, watch the run, and on
    /// a non-success conclusion classify every failed step.
    ///
    /// Trigger and monitor errors propagate verbatim.
    pub async fn debug(
        &self,
        workflow: &str,
        branch: &str,
        inputs: &HashMap<String, String>,
    ) -> Result<DebugReport> {
        info!("Triggering workflow {workflow} on {branch}");
        let triggered = self.provider.trigger(workflow, branch, inputs).await?;
        info!(
            "Triggered run {} ({})",
            triggered.run_id, triggered.run_url
        );

        self.debug_run(triggered.run_id).await
    }

    /// Debug an already-triggered run: watch it to completion, then collect
    /// and classify failures.
    pub async fn debug_run(&self, run_id: u64) -> Result<DebugReport> {
        let monitor = RunMonitor::new(self.provider.as_ref());
        let mut run = monitor
            .watch(
                run_id,
                self.options.poll_interval,
                self.options.timeout,
                self.observer.as_ref(),
            )
            .await?;

        if run
            .conclusion
            .as_ref()
            .is_some_and(Conclusion::is_success)
        {
            info!("Run {run_id} succeeded");
            return Ok(DebugReport::from_run(&run, vec![]));
        }

        self.collect_failed_step_logs(&mut run).await;
        let errors = self.classify_failed_steps(&run);

        Ok(DebugReport::from_run(&run, errors))
    }

    /// Fetch log text for failed steps only.
    ///
    /// Fetches run concurrently; results are written back in job/step
    /// traversal order. A failed fetch is logged and leaves the step without
    /// log text, which routes it to the classifier's "no logs" branch
    /// instead of aborting the session.
    async fn collect_failed_step_logs(&self, run: &mut Run) {
        let mut coords: Vec<(usize, usize, u64, u32)> = Vec::new();
        for (job_idx, job) in run.jobs.iter().enumerate() {
            for (step_idx, step) in job.steps.iter().enumerate() {
                if step.is_failed() {
                    coords.push((job_idx, step_idx, job.id, step.number));
                }
            }
        }

        let run_id = run.id;
        let fetches = coords.iter().map(|&(_, _, job_id, step_number)| {
            self.provider
                .fetch_failed_step_logs(run_id, job_id, step_number)
        });
        let results = join_all(fetches).await;

        for ((job_idx, step_idx, job_id, step_number), result) in
            coords.into_iter().zip(results)
        {
            match result {
                Ok(log) => run.jobs[job_idx].steps[step_idx].log = Some(log),
                Err(err) => warn!(
                    "Could not fetch logs for job {job_id} step {step_number}: {err}"
                ),
            }
        }
    }

    /// Classify every failed step, in (job, step) traversal order.
    fn classify_failed_steps(&self, run: &Run) -> Vec<ErrorInfo> {
        run.jobs
            .iter()
            .flat_map(|job| {
                job.steps
                    .iter()
                    .filter(|step| step.is_failed())
                    .map(|step| self.classifier.classify(&job.name, step))
            })
            .collect()
    }
}
