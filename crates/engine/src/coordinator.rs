// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! The job lifecycle coordinator.
//!
//! One instance owns every active run. Submissions are validated and
//! persisted synchronously, then the run itself is driven on a spawned
//! task. The handle table arbitrates the cancel/finish race: whichever
//! side removes a job's handle owns its terminal transition, so exactly
//! one terminal state is written per job.
//!
//! There is no admission control and no runtime watchdog: every
//! submission runs immediately, and a run lasts until it resolves,
//! fails, or is cancelled.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use sweep_catalog::Catalog;
use sweep_core::{
    Clock, Finding, FindingId, Job, JobId, JobPatch, JobSpec, JobStatus, SystemClock,
};
use sweep_storage::{RecordStore, StoreError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::SubmitError;
use crate::exec::{ExecOutcome, ProgressUpdate, ToolExecutor};

/// Progress channel depth; the relay loop drains continuously, so this
/// only needs to absorb short bursts.
const PROGRESS_BUFFER: usize = 16;

pub struct Coordinator<S, X, C = SystemClock> {
    store: Arc<S>,
    executor: Arc<X>,
    catalog: Arc<Catalog>,
    clock: C,
    /// Cancellation handles for runs that have registered and not yet
    /// reached a terminal transition.
    handles: Arc<Mutex<HashMap<JobId, CancellationToken>>>,
}

impl<S, X, C: Clock> Clone for Coordinator<S, X, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            executor: Arc::clone(&self.executor),
            catalog: Arc::clone(&self.catalog),
            clock: self.clock.clone(),
            handles: Arc::clone(&self.handles),
        }
    }
}

impl<S: RecordStore, X: ToolExecutor> Coordinator<S, X, SystemClock> {
    pub fn new(store: Arc<S>, executor: Arc<X>, catalog: Arc<Catalog>) -> Self {
        Self::with_clock(store, executor, catalog, SystemClock)
    }
}

impl<S, X, C> Coordinator<S, X, C>
where
    S: RecordStore,
    X: ToolExecutor,
    C: Clock,
{
    pub fn with_clock(store: Arc<S>, executor: Arc<X>, catalog: Arc<Catalog>, clock: C) -> Self {
        Self {
            store,
            executor,
            catalog,
            clock,
            handles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Validate a submission, persist the queued record, and schedule
    /// the run. Returns as soon as the record is durable; the run itself
    /// proceeds on a background task.
    ///
    /// A submission that fails validation or the initial persist leaves
    /// no record and schedules nothing.
    pub fn submit(&self, spec: JobSpec) -> Result<JobId, SubmitError> {
        let sanitized = self
            .catalog
            .validate_submission(&spec.tool, &spec.target, &spec.parameters)?;

        let mut spec = spec;
        if let Some(serde_json::Value::String(target)) = sanitized.get("target") {
            spec.target = target.clone();
        }
        spec.parameters = sanitized;

        let job = Job::new(spec, &self.clock);
        let id = job.id.clone();
        self.store.insert_job(job.clone())?;

        let this = self.clone();
        tokio::spawn(async move { this.run_job(job).await });
        Ok(id)
    }

    /// Cancel a job. Running jobs have their token cancelled; queued
    /// jobs are marked terminal before their run can register. Terminal
    /// jobs are left untouched and report their current status.
    pub fn cancel(&self, id: &JobId) -> Result<JobStatus, StoreError> {
        let mut handles = self.handles.lock();
        if let Some(token) = handles.remove(id) {
            drop(handles);
            // Handle removed: this call owns the terminal transition.
            token.cancel();
            self.apply_terminal(id, self.cancelled_patch());
            return Ok(JobStatus::Cancelled);
        }

        let job = self
            .store
            .get_job(id)?
            .ok_or_else(|| StoreError::JobNotFound(id.clone()))?;
        if job.is_terminal() {
            return Ok(job.status);
        }
        // Running with no handle: the run task already claimed the
        // terminal transition and is writing it. Report the status as
        // read rather than racing that write.
        if job.status == JobStatus::Running {
            return Ok(job.status);
        }
        // Queued, run not yet registered. The write happens under the
        // handle lock so the run task cannot register concurrently; it
        // will see the terminal record and stand down.
        self.store.update_job(id, self.cancelled_patch())?;
        Ok(JobStatus::Cancelled)
    }

    /// Whether a run is registered and not yet terminal.
    pub fn is_active(&self, id: &JobId) -> bool {
        self.handles.lock().contains_key(id)
    }

    pub fn jobs(&self) -> Result<Vec<Job>, StoreError> {
        self.store.list_jobs()
    }

    pub fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        self.store.get_job(id)
    }

    pub fn findings(&self, id: &JobId) -> Result<Vec<Finding>, StoreError> {
        self.store.list_findings(id)
    }

    /// Drive one job's run to a terminal state.
    async fn run_job(&self, job: Job) {
        let token = CancellationToken::new();
        {
            let mut handles = self.handles.lock();
            if handles.contains_key(&job.id) {
                debug!(job = %job.id, "run already registered, ignoring");
                return;
            }
            match self.store.get_job(&job.id) {
                // Cancelled while queued: the record is terminal, stand down.
                Ok(Some(current)) if current.is_terminal() => return,
                Ok(Some(_)) => {}
                Ok(None) => {
                    warn!(job = %job.id, "record vanished before run start");
                    return;
                }
                Err(err) => {
                    warn!(job = %job.id, %err, "store read failed at run start");
                    return;
                }
            }
            handles.insert(job.id.clone(), token.clone());
        }

        let start_patch = JobPatch::default()
            .status(JobStatus::Running)
            .started_at_ms(self.clock.epoch_ms());
        if let Err(err) = self.store.update_job(&job.id, start_patch) {
            warn!(job = %job.id, %err, "running transition write failed");
        }

        let (tx, mut rx) = mpsc::channel(PROGRESS_BUFFER);
        let run = self.executor.run(&job, tx, token.clone());
        tokio::pin!(run);

        let mut last_percent = 0u8;
        let mut channel_open = true;
        let result = loop {
            tokio::select! {
                update = rx.recv(), if channel_open => {
                    match update {
                        Some(update) => self.record_progress(&job.id, &mut last_percent, update),
                        // Executor dropped its sender; wait on the run alone.
                        None => channel_open = false,
                    }
                }
                result = &mut run => break result,
            }
        };
        // Progress that raced the run's completion is still recorded.
        while let Ok(update) = rx.try_recv() {
            self.record_progress(&job.id, &mut last_percent, update);
        }

        // Lost the handle to a concurrent cancel: that call owns the
        // terminal transition, nothing more to write here.
        if self.handles.lock().remove(&job.id).is_none() {
            return;
        }

        match result {
            Ok(Some(outcome)) => self.finish(&job, outcome),
            Ok(None) => self.apply_terminal(&job.id, self.cancelled_patch()),
            Err(err) => {
                let patch = JobPatch::default()
                    .status(JobStatus::Failed)
                    .completed_at_ms(self.clock.epoch_ms())
                    .append_log(format!("[ERROR] Job execution failed: {err}"));
                self.apply_terminal(&job.id, patch);
            }
        }
    }

    /// Persist one progress batch. Percentages only move forward; a
    /// stale batch still contributes its log lines.
    fn record_progress(&self, id: &JobId, last_percent: &mut u8, update: ProgressUpdate) {
        let mut patch = JobPatch::default().append_logs(update.lines);
        if update.percent > *last_percent {
            *last_percent = update.percent;
            patch = patch.progress(update.percent);
        }
        if let Err(err) = self.store.update_job(id, patch) {
            warn!(job = %id, %err, "progress write failed");
        }
    }

    fn finish(&self, job: &Job, outcome: ExecOutcome) {
        let patch = JobPatch::default()
            .status(JobStatus::Completed)
            .progress(100)
            .completed_at_ms(self.clock.epoch_ms())
            .append_log("[SUCCESS] Job completed successfully")
            .artifacts(outcome.artifacts);
        self.apply_terminal(&job.id, patch);

        for def in outcome.findings {
            let finding = Finding {
                id: FindingId::new(),
                job_id: job.id.clone(),
                severity: def.severity,
                title: def.title,
                description: def.description,
                category: job.category.clone(),
            };
            if let Err(err) = self.store.insert_finding(finding) {
                warn!(job = %job.id, %err, "finding write failed");
            }
        }
    }

    fn cancelled_patch(&self) -> JobPatch {
        JobPatch::default()
            .status(JobStatus::Cancelled)
            .completed_at_ms(self.clock.epoch_ms())
            .append_log("[WARN] Job cancelled by user")
    }

    /// Terminal transition write: one retry, then give up with a warning.
    /// The handle is already removed, so a lost write leaves the record
    /// stale rather than double-finalized.
    fn apply_terminal(&self, id: &JobId, patch: JobPatch) {
        if self.store.update_job(id, patch.clone()).is_ok() {
            return;
        }
        if let Err(err) = self.store.update_job(id, patch) {
            warn!(job = %id, %err, "terminal transition write failed twice");
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
