// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sweep-core: leaf types for the sweep job coordinator.
//!
//! Job records and their state machine, artifact and finding records,
//! typed IDs, and the clock abstraction. No async, no I/O.

pub mod macros;

pub mod clock;
pub mod finding;
pub mod id;
pub mod job;

pub use clock::{Clock, FakeClock, SystemClock};
pub use finding::{Finding, FindingId, Severity};
pub use id::short;
#[cfg(any(test, feature = "test-support"))]
pub use job::JobBuilder;
pub use job::{Artifact, Job, JobId, JobPatch, JobSpec, JobStatus};
