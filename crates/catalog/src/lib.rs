// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sweep-catalog: the static tool catalog and parameter validator.
//!
//! The catalog is declarative configuration, not code: each tool entry
//! carries its baseline duration, parameter schema, and result profile
//! (log lines, artifacts, findings). New tools are added by editing the
//! TOML table, never by adding branches to the engine.

pub mod profile;
pub mod validate;

pub use profile::{ArtifactDef, FieldKind, FindingDef, ParamDef, ToolProfile};
pub use validate::{sanitize_text, ValidationError};

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Fallback baseline duration for tools that do not declare one.
pub const DEFAULT_DURATION_MS: u64 = 30_000;

/// Catalog definition TOML embedded at build time.
const BUILTIN_TOML: &str = include_str!("../builtin.toml");

/// Errors raised while loading a catalog definition.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    default_duration_ms: Option<u64>,
    #[serde(default)]
    tools: HashMap<String, ToolProfile>,
}

/// The set of known tools with their schemas and result profiles.
///
/// Read-only configuration consumed by the validator and the execution
/// engine; looked up by exact tool name.
#[derive(Debug, Clone)]
pub struct Catalog {
    tools: HashMap<String, ToolProfile>,
    default_duration_ms: u64,
}

impl Catalog {
    /// Load a catalog from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(input)?;
        let mut tools = file.tools;
        for (name, profile) in tools.iter_mut() {
            profile.name.clone_from(name);
        }
        Ok(Self {
            tools,
            default_duration_ms: file.default_duration_ms.unwrap_or(DEFAULT_DURATION_MS),
        })
    }

    /// Load the built-in catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_TOML)
    }

    /// Look up a tool by name.
    pub fn get(&self, tool: &str) -> Option<&ToolProfile> {
        self.tools.get(tool)
    }

    /// Whether the tool is known to this catalog.
    pub fn contains(&self, tool: &str) -> bool {
        self.tools.contains_key(tool)
    }

    /// Baseline duration for a tool, falling back to the catalog default.
    pub fn duration_ms(&self, tool: &str) -> u64 {
        self.tools
            .get(tool)
            .and_then(|p| p.duration_ms)
            .unwrap_or(self.default_duration_ms)
    }

    /// Names of all known tools.
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Validate and sanitize a submission's target and parameters against
    /// the tool's schema. See [`validate`] for the rules.
    pub fn validate_submission(
        &self,
        tool: &str,
        target: &str,
        parameters: &HashMap<String, serde_json::Value>,
    ) -> Result<HashMap<String, serde_json::Value>, ValidationError> {
        let profile = self
            .get(tool)
            .ok_or_else(|| ValidationError::UnknownTool(tool.to_string()))?;
        validate::validate_submission(profile, target, parameters)
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
