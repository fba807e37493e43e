// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Independent lifecycles for concurrent runs.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn duplicate_submissions_run_independently() {
    let h = harness();
    let first = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();
    let second = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();
    assert_ne!(first, second);

    h.elapse(Duration::from_secs(31)).await;
    for id in [&first, &second] {
        let job = h.job(id);
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.artifacts.len(), 3);
        assert_eq!(h.coordinator.findings(id).unwrap().len(), 2);
    }
}

#[tokio::test(start_paused = true)]
async fn mixed_durations_complete_on_their_own_schedules() {
    let h = harness();
    // theHarvester: 20 seconds. Nmap: 30 seconds.
    let quick = h
        .coordinator
        .submit(spec("theHarvester", "example.com"))
        .unwrap();
    let slow = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();

    h.elapse(Duration::from_secs(21)).await;
    assert_eq!(h.job(&quick).status, JobStatus::Completed);
    assert_eq!(h.job(&slow).status, JobStatus::Running);

    h.elapse(Duration::from_secs(10)).await;
    assert_eq!(h.job(&slow).status, JobStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn cancelling_one_run_leaves_the_other_alone() {
    let h = harness();
    let doomed = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();
    let survivor = h.coordinator.submit(spec("Nmap", "203.0.113.11")).unwrap();

    h.elapse(Duration::from_secs(13)).await;
    h.coordinator.cancel(&doomed).unwrap();

    h.elapse(Duration::from_secs(20)).await;
    assert_eq!(h.job(&doomed).status, JobStatus::Cancelled);
    let survivor = h.job(&survivor);
    assert_eq!(survivor.status, JobStatus::Completed);
    assert_eq!(survivor.progress, 100);
}
