// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sweep-engine: job lifecycle coordination.
//!
//! [`Coordinator`] owns the full lifecycle of a job record: it validates
//! submissions against the tool catalog, persists the queued record,
//! drives the run on a background task, relays progress into storage,
//! and arbitrates the cancel/finish race so exactly one terminal state
//! is ever written. [`ToolExecutor`] is the seam between the lifecycle
//! machinery and the tool runs themselves; [`SimExecutor`] is the
//! catalog-driven simulation backend.

pub mod coordinator;
pub mod error;
pub mod exec;

pub use coordinator::Coordinator;
pub use error::{ExecError, SubmitError};
pub use exec::{ExecOutcome, ProgressUpdate, SimExecutor, ToolExecutor};
