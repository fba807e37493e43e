// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! In-process record store backed by a single mutex.

use crate::{RecordStore, StoreError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use sweep_core::{Clock, Finding, Job, JobId, JobPatch, SystemClock};

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, Job>,
    /// Insertion order, oldest first
    order: Vec<JobId>,
    findings: Vec<Finding>,
}

/// In-memory [`RecordStore`].
///
/// One mutex serializes all access, which is what gives the store its
/// atomic-per-call contract.
#[derive(Clone)]
pub struct MemoryStore<C: Clock = SystemClock> {
    inner: Arc<Mutex<Inner>>,
    clock: C,
}

impl MemoryStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            clock,
        }
    }
}

impl<C: Clock> RecordStore for MemoryStore<C> {
    fn insert_job(&self, job: Job) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let id = job.id.clone();
        if inner.jobs.insert(id.clone(), job).is_none() {
            inner.order.push(id);
        }
        Ok(())
    }

    fn update_job(&self, id: &JobId, patch: JobPatch) -> Result<Job, StoreError> {
        let now_ms = self.clock.epoch_ms();
        let mut inner = self.inner.lock();
        let job = inner
            .jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::JobNotFound(id.clone()))?;
        patch.apply(job, now_ms);
        Ok(job.clone())
    }

    fn get_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.inner.lock().jobs.get(id).cloned())
    }

    fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.jobs.get(id).cloned())
            .collect())
    }

    fn insert_finding(&self, finding: Finding) -> Result<(), StoreError> {
        self.inner.lock().findings.push(finding);
        Ok(())
    }

    fn list_findings(&self, job_id: &JobId) -> Result<Vec<Finding>, StoreError> {
        Ok(self
            .inner
            .lock()
            .findings
            .iter()
            .filter(|f| &f.job_id == job_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
