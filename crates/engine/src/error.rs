// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Engine error types

use sweep_catalog::ValidationError;
use sweep_storage::StoreError;
use thiserror::Error;

/// Submission rejected before a record was created, or the initial
/// persist failed. Either way no run is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("persistence error: {0}")]
    Store(#[from] StoreError),
}

/// A run failed mid-flight. The message is appended to the job log
/// verbatim, so keep these operator-readable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("target unreachable: {0}")]
    TargetUnreachable(String),
    #[error("tool crashed: {0}")]
    ToolCrash(String),
    #[error("execution fault: {0}")]
    Fault(String),
}
