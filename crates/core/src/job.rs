// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Job record and state machine.

use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    /// Unique identifier for a submitted job.
    ///
    /// Assigned at creation and immutable. The ID is the sole
    /// deduplication key for the at-most-one-concurrent-run guarantee;
    /// two submissions with identical content get distinct IDs and run
    /// independently.
    pub struct JobId("job-");
}

/// Lifecycle status of a job.
///
/// Legal transitions: `Queued → Running → {Completed | Failed}`,
/// `Queued → Cancelled`, `Running → Cancelled`. The three right-hand
/// states are terminal; nothing leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted and persisted, not yet picked up by the executor
    Queued,
    /// Executor invocation in flight
    Running,
    /// Executor resolved successfully
    Completed,
    /// Executor faulted
    Failed,
    /// Stopped by the caller
    Cancelled,
}

impl JobStatus {
    /// Check if this status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Running)
                | (JobStatus::Queued, JobStatus::Cancelled)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
                | (JobStatus::Running, JobStatus::Cancelled)
        )
    }
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// Immutable descriptor of an output file produced at job finalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    /// Human-readable size (e.g. "245 KB")
    pub size: String,
    /// Format tag (e.g. "XML", "JSON", "CSV")
    pub format: String,
    /// Content hash, prefixed with the algorithm (e.g. "sha256:...")
    pub hash: String,
}

/// Submission intake DTO: everything the caller supplies to create a job.
///
/// Must have passed parameter validation before reaching the coordinator.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub project: String,
    pub name: String,
    pub tool: String,
    pub category: String,
    pub target: String,
    pub parameters: HashMap<String, serde_json::Value>,
    pub created_by: String,
}

impl JobSpec {
    pub fn builder(tool: impl Into<String>, target: impl Into<String>) -> JobSpecBuilder {
        JobSpecBuilder {
            spec: JobSpec {
                project: String::new(),
                name: String::new(),
                tool: tool.into(),
                category: String::new(),
                target: target.into(),
                parameters: HashMap::new(),
                created_by: String::new(),
            },
        }
    }
}

pub struct JobSpecBuilder {
    spec: JobSpec,
}

impl JobSpecBuilder {
    pub fn project(mut self, v: impl Into<String>) -> Self {
        self.spec.project = v.into();
        self
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.spec.name = v.into();
        self
    }

    pub fn category(mut self, v: impl Into<String>) -> Self {
        self.spec.category = v.into();
        self
    }

    pub fn created_by(mut self, v: impl Into<String>) -> Self {
        self.spec.created_by = v.into();
        self
    }

    pub fn parameters(mut self, v: HashMap<String, serde_json::Value>) -> Self {
        self.spec.parameters = v;
        self
    }

    /// Add a single parameter, converting the value via `serde_json::Value::from`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.spec.parameters.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> JobSpec {
        self.spec
    }
}

/// A persisted job record.
///
/// Mutated only by the coordinator (status/progress/timestamps/logs/
/// artifacts). Readers never write; the core never deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub project: String,
    pub name: String,
    pub tool: String,
    pub category: String,
    pub target: String,
    pub parameters: HashMap<String, serde_json::Value>,
    pub status: JobStatus,
    /// 0–100. Monotonically non-decreasing while running; 100 at completed.
    pub progress: u8,
    /// Set exactly once, at the queued → running transition.
    pub started_at_ms: Option<u64>,
    /// Set exactly once, at any transition into a terminal state.
    pub completed_at_ms: Option<u64>,
    /// Ordered text lines, append-only during the run
    pub logs: Vec<String>,
    pub artifacts: Vec<Artifact>,
    pub created_by: String,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl Job {
    /// Create a new job in `Queued` with progress 0.
    pub fn new(spec: JobSpec, clock: &impl Clock) -> Self {
        Self::new_at(spec, clock.epoch_ms())
    }

    /// Create a new job with an explicit creation timestamp.
    pub fn new_at(spec: JobSpec, epoch_ms: u64) -> Self {
        Self {
            id: JobId::new(),
            project: spec.project,
            name: spec.name,
            tool: spec.tool,
            category: spec.category,
            target: spec.target,
            parameters: spec.parameters,
            status: JobStatus::Queued,
            progress: 0,
            started_at_ms: None,
            completed_at_ms: None,
            logs: Vec::new(),
            artifacts: Vec::new(),
            created_by: spec.created_by,
            created_at_ms: epoch_ms,
            updated_at_ms: epoch_ms,
        }
    }

    /// Check if the job is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Partial update applied to a stored job record.
///
/// `None` fields are left untouched; `append_logs` lines are appended to
/// the existing log. Timestamps are write-once: a patch never overwrites
/// an already-set `started_at_ms`/`completed_at_ms`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    #[serde(default)]
    pub append_logs: Vec<String>,
    pub artifacts: Option<Vec<Artifact>>,
}

impl JobPatch {
    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress.min(100));
        self
    }

    pub fn started_at_ms(mut self, ms: u64) -> Self {
        self.started_at_ms = Some(ms);
        self
    }

    pub fn completed_at_ms(mut self, ms: u64) -> Self {
        self.completed_at_ms = Some(ms);
        self
    }

    pub fn append_log(mut self, line: impl Into<String>) -> Self {
        self.append_logs.push(line.into());
        self
    }

    pub fn append_logs(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.append_logs.extend(lines);
        self
    }

    pub fn artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Apply this patch to a job in place, stamping `updated_at_ms`.
    ///
    /// A status the state machine does not permit from the job's current
    /// status is dropped; the rest of the patch still applies. Terminal
    /// records in particular never change status again.
    pub fn apply(&self, job: &mut Job, now_ms: u64) {
        if let Some(status) = self.status {
            if job.status.can_transition_to(status) {
                job.status = status;
            }
        }
        if let Some(progress) = self.progress {
            job.progress = progress.min(100);
        }
        if let Some(ms) = self.started_at_ms {
            if job.started_at_ms.is_none() {
                job.started_at_ms = Some(ms);
            }
        }
        if let Some(ms) = self.completed_at_ms {
            if job.completed_at_ms.is_none() {
                job.completed_at_ms = Some(ms);
            }
        }
        job.logs.extend(self.append_logs.iter().cloned());
        if let Some(artifacts) = &self.artifacts {
            job.artifacts = artifacts.clone();
        }
        job.updated_at_ms = now_ms;
    }
}

/// Test builder for `Job` with sensible defaults.
#[cfg(any(test, feature = "test-support"))]
pub struct JobBuilder {
    job: Job,
}

#[cfg(any(test, feature = "test-support"))]
impl Default for JobBuilder {
    fn default() -> Self {
        let spec = JobSpec::builder("Nmap", "203.0.113.10")
            .project("prj-test")
            .name("test-scan")
            .category("reconnaissance")
            .created_by("operator")
            .build();
        Self {
            job: Job::new_at(spec, 1_000_000),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl JobBuilder {
    pub fn id(mut self, id: impl Into<JobId>) -> Self {
        self.job.id = id.into();
        self
    }

    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.job.tool = tool.into();
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.job.target = target.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.job.category = category.into();
        self
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.job.status = status;
        self
    }

    pub fn progress(mut self, progress: u8) -> Self {
        self.job.progress = progress;
        self
    }

    pub fn started_at_ms(mut self, ms: u64) -> Self {
        self.job.started_at_ms = Some(ms);
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Job {
    /// Create a builder with test defaults.
    pub fn builder() -> JobBuilder {
        JobBuilder::default()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
