// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sweep-storage: the job record store contract.
//!
//! The coordinator persists every lifecycle transition through
//! [`RecordStore`]; readers poll the same interface. Each call is atomic
//! on its own — the coordinator never needs cross-record transactions.

pub mod memory;

#[cfg(any(test, feature = "test-support"))]
pub mod faulty;

#[cfg(any(test, feature = "test-support"))]
pub use faulty::FaultyStore;
pub use memory::MemoryStore;

use sweep_core::{Finding, Job, JobId, JobPatch};
use thiserror::Error;

/// Store read/write failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("job not found: {0}")]
    JobNotFound(JobId),
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

/// Durable mapping from job identifier to job record, plus the finding
/// sink. Conflicting writes to the same record are serialized by the
/// implementation; last writer wins per call.
pub trait RecordStore: Send + Sync + 'static {
    /// Persist a new job record.
    fn insert_job(&self, job: Job) -> Result<(), StoreError>;

    /// Apply a partial update, returning the updated record.
    fn update_job(&self, id: &JobId, patch: JobPatch) -> Result<Job, StoreError>;

    /// Fetch one job record.
    fn get_job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;

    /// All job records, newest first.
    fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;

    /// Persist a finding attached to a completed job.
    fn insert_finding(&self, finding: Finding) -> Result<(), StoreError>;

    /// Findings recorded for one job.
    fn list_findings(&self, job_id: &JobId) -> Result<Vec<Finding>, StoreError>;
}
