//! Scripted in-memory provider for monitor and orchestrator tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{RunProvider, TriggeredRun, WorkflowInfo};
use crate::error::{DebugError, Result};
use crate::model::Run;

/// Replays a fixed sequence of run snapshots.
///
/// `fetch_run` pops the next snapshot and keeps returning the last one once
/// the script is exhausted, so a never-completing provider is just a script
/// ending on an in-progress snapshot.
pub(crate) struct ScriptedProvider {
    snapshots: Mutex<VecDeque<Run>>,
    logs: HashMap<(u64, u32), String>,
    fail_trigger: bool,
    fail_log_fetch: bool,
    pub fetch_count: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(snapshots: Vec<Run>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots.into()),
            logs: HashMap::new(),
            fail_trigger: false,
            fail_log_fetch: false,
            fetch_count: AtomicUsize::new(0),
        }
    }

    pub fn with_log(mut self, job_id: u64, step_number: u32, log: &str) -> Self {
        self.logs.insert((job_id, step_number), log.to_string());
        self
    }

    pub fn failing_trigger(mut self) -> Self {
        self.fail_trigger = true;
        self
    }

    pub fn failing_log_fetch(mut self) -> Self {
        self.fail_log_fetch = true;
        self
    }
}

#[async_trait]
impl RunProvider for ScriptedProvider {
    async fn trigger(
        &self,
        workflow: &str,
        _branch: &str,
        _inputs: &HashMap<String, String>,
    ) -> Result<TriggeredRun> {
        if self.fail_trigger {
            return Err(DebugError::Trigger(format!(
                "workflow {workflow} was rejected"
            )));
        }
        Ok(TriggeredRun {
            run_id: 42,
            run_url: "https://ci.example/runs/42".to_string(),
        })
    }

    async fn fetch_run(&self, _run_id: u64) -> Result<Run> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let mut snapshots = self.snapshots.lock().unwrap();
        if snapshots.len() > 1 {
            Ok(snapshots.pop_front().unwrap())
        } else {
            snapshots
                .front()
                .cloned()
                .ok_or_else(|| DebugError::Api("no snapshot scripted".to_string()))
        }
    }

    async fn fetch_failed_step_logs(
        &self,
        _run_id: u64,
        job_id: u64,
        step_number: u32,
    ) -> Result<String> {
        if self.fail_log_fetch {
            return Err(DebugError::Api("log download failed".to_string()));
        }
        self.logs
            .get(&(job_id, step_number))
            .cloned()
            .ok_or_else(|| DebugError::Api("no log scripted".to_string()))
    }

    async fn list_workflows(&self) -> Result<Vec<WorkflowInfo>> {
        Ok(vec![])
    }
}
