// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Shared harness for the lifecycle specs.

pub use std::sync::Arc;
pub use std::time::Duration;

pub use sweep_catalog::Catalog;
pub use sweep_core::{FakeClock, Job, JobId, JobSpec, JobStatus};
pub use sweep_engine::{Coordinator, SimExecutor, SubmitError};
pub use sweep_storage::{FaultyStore, MemoryStore, StoreError};

pub type SpecStore = FaultyStore<MemoryStore<FakeClock>>;
pub type SpecCoordinator = Coordinator<SpecStore, SimExecutor, FakeClock>;

/// A coordinator over a fault-injectable in-memory store, with both
/// clocks (record timestamps and tokio time) under test control.
pub struct Harness {
    pub coordinator: SpecCoordinator,
    pub store: Arc<SpecStore>,
    pub clock: FakeClock,
}

pub fn harness() -> Harness {
    let clock = FakeClock::new();
    let store = Arc::new(FaultyStore::new(MemoryStore::with_clock(clock.clone())));
    let catalog = Arc::new(Catalog::builtin().unwrap());
    let executor = Arc::new(SimExecutor::new(Arc::clone(&catalog)));
    let coordinator =
        Coordinator::with_clock(Arc::clone(&store), executor, catalog, clock.clone());
    Harness {
        coordinator,
        store,
        clock,
    }
}

pub fn spec(tool: &str, target: &str) -> JobSpec {
    let mut builder = JobSpec::builder(tool, target)
        .project("prj-acme")
        .name(format!("{tool} run"))
        .category("assessment")
        .created_by("operator");
    // Fill each tool's required flags so submissions pass validation.
    builder = match tool {
        "Nmap" => builder
            .param("scanType", "syn")
            .param("ports", "80,443")
            .param("timing", "T4")
            .param("outputFormat", "xml"),
        "Nuclei" => builder
            .param("templates", "cves")
            .param("severity", "all")
            .param("rate", "150")
            .param("timeout", "30")
            .param("outputFormat", "json"),
        "SQLMap" => builder
            .param("method", "GET")
            .param("level", "1")
            .param("risk", "1"),
        _ => builder,
    };
    builder.build()
}

impl Harness {
    /// Advance both virtual clocks together.
    pub async fn elapse(&self, duration: Duration) {
        self.clock.advance(duration);
        tokio::time::sleep(duration).await;
    }

    pub fn job(&self, id: &JobId) -> Job {
        self.coordinator
            .job(id)
            .unwrap()
            .unwrap_or_else(|| panic!("job {id} not in store"))
    }
}
