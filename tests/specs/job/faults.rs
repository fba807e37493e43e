// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Failure paths: executor faults and store faults.

use crate::prelude::*;
use async_trait::async_trait;
use sweep_engine::{ExecError, ExecOutcome, ProgressUpdate, ToolExecutor};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Executor that reports some progress, then faults mid-run.
struct MidRunFault;

#[async_trait]
impl ToolExecutor for MidRunFault {
    async fn run(
        &self,
        _job: &Job,
        progress: mpsc::Sender<ProgressUpdate>,
        _cancel: CancellationToken,
    ) -> Result<Option<ExecOutcome>, ExecError> {
        let _ = progress
            .send(ProgressUpdate {
                percent: 40,
                lines: vec!["[INFO] Enumerating services...".to_string()],
            })
            .await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        Err(ExecError::Fault("scan pipeline closed unexpectedly".to_string()))
    }
}

#[tokio::test(start_paused = true)]
async fn executor_fault_fails_the_job() {
    let clock = FakeClock::new();
    let store = Arc::new(MemoryStore::with_clock(clock.clone()));
    let catalog = Arc::new(Catalog::builtin().unwrap());
    let coordinator =
        Coordinator::with_clock(Arc::clone(&store), Arc::new(MidRunFault), catalog, clock);

    let id = coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;

    let job = coordinator.job(&id).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.progress, 40);
    assert!(job.completed_at_ms.is_some());
    assert!(job.logs.iter().any(
        |l| l == "[ERROR] Job execution failed: execution fault: scan pipeline closed unexpectedly"
    ));
    assert!(job.artifacts.is_empty());
    assert!(coordinator.findings(&id).unwrap().is_empty());

    // Terminal means terminal: nothing flips it later.
    tokio::time::sleep(Duration::from_secs(60)).await;
    let job = coordinator.job(&id).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn dropped_progress_write_does_not_fail_the_run() {
    let h = harness();
    let id = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();

    // Let the running transition land, then drop the next write.
    h.elapse(Duration::from_millis(1)).await;
    h.store.fail_job_updates(1);

    h.elapse(Duration::from_secs(31)).await;
    let job = h.job(&id);
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
}

#[tokio::test(start_paused = true)]
async fn rejected_insert_schedules_no_run() {
    let h = harness();
    h.store.fail_job_inserts(1);

    let err = h
        .coordinator
        .submit(spec("Nmap", "203.0.113.10"))
        .unwrap_err();
    assert!(matches!(err, SubmitError::Store(StoreError::Unavailable(_))));

    h.elapse(Duration::from_secs(60)).await;
    assert!(h.coordinator.jobs().unwrap().is_empty());
}
