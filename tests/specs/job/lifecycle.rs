// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Full queued → running → completed pass for a profiled tool.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn nmap_job_runs_to_completion() {
    let h = harness();
    let id = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();

    // Queued immediately, before the run task gets a chance to start.
    let job = h.job(&id);
    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(job.progress, 0);
    assert_eq!(job.started_at_ms, None);
    assert_eq!(job.completed_at_ms, None);

    // First poll of the run task flips it to running.
    h.elapse(Duration::from_millis(1)).await;
    let job = h.job(&id);
    assert_eq!(job.status, JobStatus::Running);
    assert!(job.started_at_ms.is_some());

    // Progress climbs through the 6-second ticks.
    let mut seen = vec![job.progress];
    for _ in 0..5 {
        h.elapse(Duration::from_secs(6)).await;
        seen.push(h.job(&id).progress);
    }
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "progress regressed: {seen:?}");
    assert_eq!(*seen.last().unwrap(), 100);

    let job = h.job(&id);
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.completed_at_ms.unwrap() > job.started_at_ms.unwrap());

    // Nmap's result profile: three artifacts, one of them XML.
    assert_eq!(job.artifacts.len(), 3);
    assert!(job.artifacts.iter().any(|a| a.format == "XML"));
    assert!(job.artifacts.iter().any(|a| a.name == "nmap_scan.xml"));

    let findings = h.coordinator.findings(&id).unwrap();
    assert_eq!(findings.len(), 2);
    assert!(findings
        .iter()
        .any(|f| f.title == "Open SSH Service Detected"));
}

#[tokio::test(start_paused = true)]
async fn logs_accumulate_in_order() {
    let h = harness();
    let id = h.coordinator.submit(spec("Nmap", "203.0.113.10")).unwrap();
    h.elapse(Duration::from_secs(31)).await;

    let job = h.job(&id);
    let starting = job
        .logs
        .iter()
        .position(|l| l.contains("Starting Nmap execution"))
        .unwrap();
    let scanning = job
        .logs
        .iter()
        .position(|l| l == "[INFO] Scanning target: 203.0.113.10")
        .unwrap();
    let success = job
        .logs
        .iter()
        .position(|l| l == "[SUCCESS] Job completed successfully")
        .unwrap();
    assert!(starting < scanning && scanning < success);
}

#[tokio::test(start_paused = true)]
async fn unprofiled_tool_completes_with_generic_results() {
    let h = harness();
    let submission = JobSpec::builder("Hydra", "203.0.113.10")
        .project("prj-acme")
        .category("credential-attacks")
        .created_by("operator")
        .param("service", "ssh")
        .param("username", "root")
        .param("passwordList", "rockyou.txt")
        .build();
    let id = h.coordinator.submit(submission).unwrap();

    // Hydra's catalog duration is 180 seconds.
    h.elapse(Duration::from_secs(179)).await;
    assert_eq!(h.job(&id).status, JobStatus::Running);
    h.elapse(Duration::from_secs(2)).await;

    let job = h.job(&id);
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.artifacts.len(), 1);
    assert_eq!(job.artifacts[0].name, "hydra_results.json");

    let findings = h.coordinator.findings(&id).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].title, "Tool Execution Completed");
}

#[tokio::test(start_paused = true)]
async fn jobs_listing_is_newest_first() {
    let h = harness();
    let first = h.coordinator.submit(spec("Nmap", "10.0.0.1")).unwrap();
    let second = h
        .coordinator
        .submit(spec("theHarvester", "example.com"))
        .unwrap();

    let listed: Vec<JobId> = h
        .coordinator
        .jobs()
        .unwrap()
        .into_iter()
        .map(|j| j.id)
        .collect();
    assert_eq!(listed, vec![second, first]);
}
