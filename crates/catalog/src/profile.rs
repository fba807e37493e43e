// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Per-tool profile definitions: duration, parameter schema, and the
//! result tables the engine synthesizes completions from.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use sweep_core::Severity;

/// Regex pattern for {param_name} placeholders in log templates
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Kind of a schema field, selecting the validation rule applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Host, IPv4 address, or CIDR range
    Target,
    /// Domain name only
    Domain,
    /// http/https URL
    Url,
    /// Digits only
    Number,
    /// Comma-separated ports or ranges (`80,443,1000-2000`)
    Ports,
    /// One of a fixed set of values
    Enum,
    /// Free text, sanitized
    Text,
}

/// Schema entry for a single parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Allowed values for `kind = "enum"` fields
    #[serde(default)]
    pub values: Vec<String>,
}

/// Declarative artifact produced when the tool completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDef {
    pub name: String,
    pub size: String,
    pub format: String,
    pub hash: String,
}

/// Declarative finding emitted when the tool completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingDef {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

/// One tool's catalog entry.
///
/// Tools may omit any of the result tables; the engine falls back to a
/// generic one-artifact, low-severity completion profile so every tool
/// always has a valid completion outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolProfile {
    /// Tool name (injected from the table key)
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Baseline run duration; catalog default applies when absent
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Parameter schema, keyed by parameter name
    #[serde(default)]
    pub params: HashMap<String, ParamDef>,
    /// Tool-specific log lines; `{param}` placeholders interpolate
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactDef>,
    #[serde(default)]
    pub findings: Vec<FindingDef>,
}

/// Interpolate `{name}` placeholders with parameter values.
///
/// Non-string scalars are rendered via their JSON form; unknown
/// placeholders render as "unknown", matching the source behavior of
/// echoing a fallback instead of the raw placeholder.
pub fn render(template: &str, params: &HashMap<String, serde_json::Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            match params.get(&caps[1]) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "unknown".to_string(),
            }
        })
        .to_string()
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
