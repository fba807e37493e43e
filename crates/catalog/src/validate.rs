// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sweepline Security

//! Parameter validation and sanitization.
//!
//! Pure functions: a submission's target and parameter map are checked
//! against the tool's schema and returned in sanitized form, or rejected
//! with a descriptive error naming the offending field. No job record
//! exists until this gate has passed.
//!
//! The sanitization policy escapes markup-significant characters
//! (`<>"'&`) and rejects shell-injection metacharacters and control
//! characters outright. This is an input hygiene policy, not a substitute
//! for the execution engine's own isolation.

use crate::profile::{FieldKind, ParamDef, ToolProfile};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

// Shape patterns, compile-time verified to be valid
#[allow(clippy::expect_used)]
static IP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static PORTS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(-[0-9]+)?)(,([0-9]+(-[0-9]+)?))*$")
        .expect("constant regex pattern is valid")
});

/// Characters meaningful to shell interpreters; never accepted anywhere.
/// `&` is not in this set: it is markup-significant, not shell-fatal on
/// its own, and [`sanitize_text`] escapes it as `&amp;`.
const INJECTION_CHARS: &[char] = &[';', '|', '`', '$', '(', ')', '{', '}', '[', ']'];

/// Caller-correctable validation failure. Raised before any job record
/// is created and never stored as job state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("missing required parameter `{field}`")]
    Missing { field: String },
    #[error("parameter `{field}` must be a scalar value")]
    NotScalar { field: String },
    #[error("parameter `{field}` is not a valid {expected}")]
    Invalid { field: String, expected: String },
    #[error("parameter `{field}` contains forbidden characters")]
    ForbiddenChars { field: String },
}

impl ValidationError {
    fn invalid(field: &str, expected: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            expected: expected.into(),
        }
    }
}

/// Escape markup-significant characters as HTML entities.
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}

fn forbidden_char(s: &str) -> Option<char> {
    s.chars()
        .find(|c| c.is_control() || INJECTION_CHARS.contains(c))
}

fn is_cidr(s: &str) -> bool {
    match s.split_once('/') {
        Some((ip, prefix)) => {
            IP_PATTERN.is_match(ip)
                && matches!(prefix.parse::<u8>(), Ok(p) if p <= 32)
        }
        None => false,
    }
}

fn is_valid_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("http://")
        .or_else(|| s.strip_prefix("https://"));
    match rest {
        Some(host) => !host.is_empty() && !host.contains(char::is_whitespace),
        None => false,
    }
}

fn ports_in_range(s: &str) -> bool {
    s.split([',', '-'])
        .all(|p| matches!(p.parse::<u32>(), Ok(n) if (1..=65535).contains(&n)))
}

/// Validate one scalar value against a field rule, returning the
/// sanitized replacement value.
fn check_field(
    field: &str,
    def: &ParamDef,
    value: &serde_json::Value,
) -> Result<serde_json::Value, ValidationError> {
    // Non-string scalars: numbers and bools pass as-is for numeric/text
    // fields; everything else must be a string.
    let raw = match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => match def.kind {
            FieldKind::Number if n.is_u64() => return Ok(value.clone()),
            FieldKind::Ports if matches!(n.as_u64(), Some(p) if (1..=65535).contains(&p)) => {
                return Ok(value.clone())
            }
            FieldKind::Text => return Ok(value.clone()),
            _ => n.to_string(),
        },
        serde_json::Value::Bool(_) if def.kind == FieldKind::Text => return Ok(value.clone()),
        _ => {
            return Err(ValidationError::NotScalar {
                field: field.to_string(),
            })
        }
    };

    // Shaped fields exclude injection characters by their patterns and
    // report the shape mismatch; Url and Text check explicitly.
    match def.kind {
        FieldKind::Target => {
            if IP_PATTERN.is_match(&raw) || is_cidr(&raw) || DOMAIN_PATTERN.is_match(&raw) {
                Ok(serde_json::Value::String(raw.to_lowercase()))
            } else {
                Err(ValidationError::invalid(
                    field,
                    "IP address, domain, or CIDR range",
                ))
            }
        }
        FieldKind::Domain => {
            if DOMAIN_PATTERN.is_match(&raw) {
                Ok(serde_json::Value::String(raw.to_lowercase()))
            } else {
                Err(ValidationError::invalid(field, "domain name"))
            }
        }
        FieldKind::Url => {
            if is_valid_url(&raw) && forbidden_char(&raw).is_none() {
                Ok(serde_json::Value::String(raw))
            } else {
                Err(ValidationError::invalid(field, "http(s) URL"))
            }
        }
        FieldKind::Number => {
            if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
                Ok(serde_json::Value::String(raw))
            } else {
                Err(ValidationError::invalid(field, "number"))
            }
        }
        FieldKind::Ports => {
            if PORTS_PATTERN.is_match(&raw) && ports_in_range(&raw) {
                Ok(serde_json::Value::String(raw))
            } else {
                Err(ValidationError::invalid(
                    field,
                    "port list (e.g. 80,443,1000-2000)",
                ))
            }
        }
        FieldKind::Enum => {
            if def.values.iter().any(|v| v == &raw) {
                Ok(serde_json::Value::String(raw))
            } else {
                Err(ValidationError::invalid(
                    field,
                    format!("one of [{}]", def.values.join(", ")),
                ))
            }
        }
        FieldKind::Text => {
            if forbidden_char(&raw).is_some() {
                Err(ValidationError::ForbiddenChars {
                    field: field.to_string(),
                })
            } else {
                Ok(serde_json::Value::String(sanitize_text(&raw)))
            }
        }
    }
}

static TEXT_RULE: ParamDef = ParamDef {
    kind: FieldKind::Text,
    required: false,
    values: Vec::new(),
};

static TARGET_RULE: ParamDef = ParamDef {
    kind: FieldKind::Target,
    required: true,
    values: Vec::new(),
};

/// Validate and sanitize a submission against a tool profile.
///
/// The job's target string is merged into the parameter map under
/// `"target"` (submission-level target wins) and checked against the
/// schema's target rule, defaulting to [`FieldKind::Target`] when the
/// schema does not declare one. Parameters without a schema entry are
/// treated as free text.
pub fn validate_submission(
    profile: &ToolProfile,
    target: &str,
    parameters: &HashMap<String, serde_json::Value>,
) -> Result<HashMap<String, serde_json::Value>, ValidationError> {
    let mut merged = parameters.clone();
    merged.insert(
        "target".to_string(),
        serde_json::Value::String(target.to_string()),
    );

    // Report the alphabetically first missing field so the error is
    // stable regardless of map iteration order.
    let mut missing: Vec<&String> = profile
        .params
        .iter()
        .filter(|(name, def)| def.required && !merged.contains_key(*name))
        .map(|(name, _)| name)
        .collect();
    missing.sort();
    if let Some(field) = missing.first() {
        return Err(ValidationError::Missing {
            field: (*field).clone(),
        });
    }

    let mut sanitized = HashMap::with_capacity(merged.len());
    for (name, value) in &merged {
        let def = profile.params.get(name).unwrap_or(if name == "target" {
            &TARGET_RULE
        } else {
            &TEXT_RULE
        });
        sanitized.insert(name.clone(), check_field(name, def, value)?);
    }
    Ok(sanitized)
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
