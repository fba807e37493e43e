// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Cancelling running and queued jobs.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn cancel_mid_run_is_terminal() {
    let h = harness();
    let id = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();

    h.elapse(Duration::from_secs(13)).await;
    let before = h.job(&id);
    assert_eq!(before.status, JobStatus::Running);
    assert_eq!(before.progress, 40);

    assert_eq!(h.coordinator.cancel(&id).unwrap(), JobStatus::Cancelled);
    let cancelled = h.job(&id);
    assert_eq!(cancelled.status, JobStatus::Cancelled);
    assert!(cancelled.completed_at_ms.is_some());

    // No further progress, and no completed/failed transition afterward.
    h.elapse(Duration::from_secs(120)).await;
    let after = h.job(&id);
    assert_eq!(after.status, JobStatus::Cancelled);
    assert_eq!(after.progress, 40);
    assert_eq!(after.completed_at_ms, cancelled.completed_at_ms);
    assert!(after.artifacts.is_empty());
    assert!(h.coordinator.findings(&id).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_before_the_run_starts() {
    let h = harness();
    let id = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();

    assert_eq!(h.coordinator.cancel(&id).unwrap(), JobStatus::Cancelled);

    h.elapse(Duration::from_secs(60)).await;
    let job = h.job(&id);
    assert_eq!(job.status, JobStatus::Cancelled);
    assert_eq!(job.started_at_ms, None);
    assert_eq!(job.progress, 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_is_idempotent_on_terminal_jobs() {
    let h = harness();
    let id = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();

    h.elapse(Duration::from_secs(13)).await;
    assert_eq!(h.coordinator.cancel(&id).unwrap(), JobStatus::Cancelled);
    let first = h.job(&id);

    // Second cancel reports the existing terminal state and changes nothing.
    assert_eq!(h.coordinator.cancel(&id).unwrap(), JobStatus::Cancelled);
    let second = h.job(&id);
    assert_eq!(second.completed_at_ms, first.completed_at_ms);
    assert_eq!(second.updated_at_ms, first.updated_at_ms);
}

#[tokio::test(start_paused = true)]
async fn cancel_completed_job_reports_completed() {
    let h = harness();
    let id = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();
    h.elapse(Duration::from_secs(31)).await;

    assert_eq!(h.coordinator.cancel(&id).unwrap(), JobStatus::Completed);
    assert_eq!(h.job(&id).status, JobStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn cancel_unknown_job_is_an_error() {
    let h = harness();
    let ghost = JobId::from_string("job-nope");
    assert_eq!(
        h.coordinator.cancel(&ghost).unwrap_err(),
        StoreError::JobNotFound(ghost)
    );
}
