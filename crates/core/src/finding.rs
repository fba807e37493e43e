// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Finding records attached to completed jobs.

use crate::job::JobId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a finding.
    pub struct FindingId("fnd-");
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

crate::simple_display! {
    Severity {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

/// A discrete security observation attributed to a completed job.
///
/// Created only when a job completes successfully and the executor
/// reports findings. Never mutated or deleted afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: FindingId,
    /// The job whose run produced this observation
    pub job_id: JobId,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Category inherited from the originating job
    pub category: String,
}

#[cfg(test)]
#[path = "finding_tests.rs"]
mod tests;
