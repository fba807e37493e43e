// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Tool execution backends.
//!
//! The coordinator only sees [`ToolExecutor`]: feed it a job, receive
//! progress over a channel, and get an outcome (or an error, or `None`
//! on a cancelled run). [`SimExecutor`] synthesizes realistic runs from
//! the tool catalog's duration and result profiles.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Duration;
use sweep_catalog::{profile::render, Catalog};
use sweep_core::{Artifact, Job, Severity};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;

/// Number of progress emissions per run; each advances by an equal step.
pub const PROGRESS_STEPS: u8 = 5;

/// One batch of progress: the new overall percentage and the log lines
/// produced since the previous batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub percent: u8,
    pub lines: Vec<String>,
}

/// Results of a completed run.
#[derive(Debug, Clone, Default)]
pub struct ExecOutcome {
    pub artifacts: Vec<Artifact>,
    pub findings: Vec<sweep_catalog::FindingDef>,
}

/// A tool run backend.
///
/// `Ok(None)` means the run observed cancellation and stopped; the
/// caller owns the terminal transition in that case and the executor
/// must not report success or failure for it.
#[async_trait]
pub trait ToolExecutor: Send + Sync + 'static {
    async fn run(
        &self,
        job: &Job,
        progress: mpsc::Sender<ProgressUpdate>,
        cancel: CancellationToken,
    ) -> Result<Option<ExecOutcome>, ExecError>;
}

/// Catalog-driven simulation backend.
///
/// Runs take the tool's catalog duration, emit five evenly spaced
/// progress batches, and complete with the tool's result profile (or a
/// generic single-artifact outcome for unprofiled tools).
#[derive(Clone)]
pub struct SimExecutor {
    catalog: Arc<Catalog>,
}

impl SimExecutor {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolExecutor for SimExecutor {
    async fn run(
        &self,
        job: &Job,
        progress: mpsc::Sender<ProgressUpdate>,
        cancel: CancellationToken,
    ) -> Result<Option<ExecOutcome>, ExecError> {
        let profile = self.catalog.get(&job.tool);
        let duration_ms = self.catalog.duration_ms(&job.tool);
        let tick = Duration::from_millis(duration_ms / u64::from(PROGRESS_STEPS));

        let tool_lines = match profile {
            Some(p) if !p.logs.is_empty() => p
                .logs
                .iter()
                .map(|t| render(t, &job.parameters))
                .collect(),
            _ => vec!["[INFO] Tool execution completed".to_string()],
        };

        // Startup lines land with the first (0%) emission.
        let prelude = ProgressUpdate {
            percent: 0,
            lines: prelude_lines(job),
        };
        if progress.send(prelude).await.is_err() {
            return Ok(None);
        }

        for step in 1..=PROGRESS_STEPS {
            tokio::select! {
                () = cancel.cancelled() => return Ok(None),
                () = tokio::time::sleep(tick) => {}
            }
            let update = ProgressUpdate {
                percent: (100 / PROGRESS_STEPS) * step,
                lines: chunk(&tool_lines, step),
            };
            if progress.send(update).await.is_err() {
                return Ok(None);
            }
        }

        let outcome = match profile {
            Some(p) if !p.artifacts.is_empty() || !p.findings.is_empty() => ExecOutcome {
                artifacts: p
                    .artifacts
                    .iter()
                    .map(|a| Artifact {
                        name: a.name.clone(),
                        size: a.size.clone(),
                        format: a.format.clone(),
                        hash: a.hash.clone(),
                    })
                    .collect(),
                findings: p.findings.clone(),
            },
            _ => generic_outcome(job),
        };
        Ok(Some(outcome))
    }
}

fn prelude_lines(job: &Job) -> Vec<String> {
    let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let params = serde_json::to_string(&job.parameters).unwrap_or_else(|_| "{}".to_string());
    vec![
        format!("[{stamp}] Starting {} execution", job.tool),
        format!("[{stamp}] Target: {}", job.target),
        format!("[{stamp}] Parameters: {params}"),
        "[INFO] Initializing tool environment...".to_string(),
    ]
}

/// Slice of `lines` for 1-based `step` of [`PROGRESS_STEPS`], covering
/// every line exactly once across the full run.
fn chunk(lines: &[String], step: u8) -> Vec<String> {
    let steps = usize::from(PROGRESS_STEPS);
    let lo = lines.len() * usize::from(step - 1) / steps;
    let hi = lines.len() * usize::from(step) / steps;
    lines[lo..hi].to_vec()
}

/// Fallback outcome for tools without a result profile.
fn generic_outcome(job: &Job) -> ExecOutcome {
    let slug = job.tool.to_lowercase().replace(' ', "_");
    ExecOutcome {
        artifacts: vec![Artifact {
            name: format!("{slug}_results.json"),
            size: "50 KB".to_string(),
            format: "JSON".to_string(),
            hash: format!("sha256:{:06x}", fold_hash(job.id.as_str())),
        }],
        findings: vec![sweep_catalog::FindingDef {
            severity: Severity::Low,
            title: "Tool Execution Completed".to_string(),
            description: format!("{} completed against {}", job.tool, job.target),
        }],
    }
}

// FNV-1a, truncated to 24 bits for the display hash.
fn fold_hash(s: &str) -> u32 {
    let mut h: u32 = 0x811c_9dc5;
    for b in s.bytes() {
        h ^= u32::from(b);
        h = h.wrapping_mul(0x0100_0193);
    }
    h & 0x00ff_ffff
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
