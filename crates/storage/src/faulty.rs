// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Fault-injecting store wrapper for failure-path tests.

use crate::{RecordStore, StoreError};
use parking_lot::Mutex;
use std::sync::Arc;
use sweep_core::{Finding, Job, JobId, JobPatch};

#[derive(Default)]
struct Faults {
    job_inserts: u32,
    job_updates: u32,
    finding_inserts: u32,
}

/// Wraps another store and fails a configured number of upcoming calls
/// per operation with [`StoreError::Unavailable`].
#[derive(Clone)]
pub struct FaultyStore<S> {
    inner: S,
    faults: Arc<Mutex<Faults>>,
}

impl<S: RecordStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            faults: Arc::new(Mutex::new(Faults::default())),
        }
    }

    /// Fail the next `n` `insert_job` calls.
    pub fn fail_job_inserts(&self, n: u32) {
        self.faults.lock().job_inserts = n;
    }

    /// Fail the next `n` `update_job` calls.
    pub fn fail_job_updates(&self, n: u32) {
        self.faults.lock().job_updates = n;
    }

    /// Fail the next `n` `insert_finding` calls.
    pub fn fail_finding_inserts(&self, n: u32) {
        self.faults.lock().finding_inserts = n;
    }
}

fn take(counter: &mut u32) -> bool {
    if *counter > 0 {
        *counter -= 1;
        true
    } else {
        false
    }
}

impl<S: RecordStore> RecordStore for FaultyStore<S> {
    fn insert_job(&self, job: Job) -> Result<(), StoreError> {
        if take(&mut self.faults.lock().job_inserts) {
            return Err(StoreError::Unavailable("injected insert fault".to_string()));
        }
        self.inner.insert_job(job)
    }

    fn update_job(&self, id: &JobId, patch: JobPatch) -> Result<Job, StoreError> {
        if take(&mut self.faults.lock().job_updates) {
            return Err(StoreError::Unavailable("injected update fault".to_string()));
        }
        self.inner.update_job(id, patch)
    }

    fn get_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        self.inner.get_job(id)
    }

    fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        self.inner.list_jobs()
    }

    fn insert_finding(&self, finding: Finding) -> Result<(), StoreError> {
        if take(&mut self.faults.lock().finding_inserts) {
            return Err(StoreError::Unavailable(
                "injected finding fault".to_string(),
            ));
        }
        self.inner.insert_finding(finding)
    }

    fn list_findings(&self, job_id: &JobId) -> Result<Vec<Finding>, StoreError> {
        self.inner.list_findings(job_id)
    }
}
