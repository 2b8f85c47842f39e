// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semantic validation for manifests.
//!
//! This module validates that parsed manifests are semantically correct:
//! - Required fields present (label, transport)
//! - Transport type resolvable (explicit or inferable from fields)
//! - HTTP methods recognized

use super::types::{RawManifest, RawTransport};
use crate::action::HttpMethod;

/// Result of validation
pub type ValidationResult = Result<ValidatedManifest, ValidationErrors>;

/// A validated manifest (same structure as RawManifest but validated)
///
/// This type is a marker that the manifest has passed validation.
/// The actual data is the same as RawManifest.
#[derive(Debug, Clone)]
pub struct ValidatedManifest {
    /// The underlying raw manifest
    pub raw: RawManifest,
}

/// Collection of validation errors
#[derive(Debug, Clone)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Manifest validation failed with {} error(s):",
            self.errors.len()
        )?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}: {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A single validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Missing required field
    MissingRequired {
        item_kind: &'static str,
        item_name: String,
        field: &'static str,
    },
    /// Field holds a value outside its accepted set
    InvalidValue {
        item_name: String,
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Transport sets both rest and channel fields without an explicit type
    AmbiguousTransport { item_name: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequired {
                item_kind,
                item_name,
                field,
            } => write!(
                f,
                "{} '{}' missing required field '{}'",
                item_kind, item_name, field
            ),
            ValidationError::InvalidValue {
                item_name,
                field,
                value,
                expected,
            } => write!(
                f,
                "invalid {} '{}' in action '{}': expected {}",
                field, value, item_name, expected
            ),
            ValidationError::AmbiguousTransport { item_name } => write!(
                f,
                "action '{}' sets both endpoint and event_name without a transport type",
                item_name
            ),
        }
    }
}

/// Validate a manifest.
pub fn validate_manifest(raw: &RawManifest) -> ValidationResult {
    let mut errors = Vec::new();

    for (name, action) in &raw.action {
        if action.label.is_none() {
            errors.push(ValidationError::MissingRequired {
                item_kind: "action",
                item_name: name.clone(),
                field: "label",
            });
        }

        match &action.transport {
            Some(transport) => validate_transport(name, transport, &mut errors),
            None => errors.push(ValidationError::MissingRequired {
                item_kind: "action",
                item_name: name.clone(),
                field: "transport",
            }),
        }
    }

    if errors.is_empty() {
        Ok(ValidatedManifest { raw: raw.clone() })
    } else {
        Err(ValidationErrors { errors })
    }
}

fn validate_transport(name: &str, transport: &RawTransport, errors: &mut Vec<ValidationError>) {
    match transport.resolved_type() {
        Some("rest") => {
            if transport.endpoint.is_none() {
                errors.push(ValidationError::MissingRequired {
                    item_kind: "action",
                    item_name: name.to_string(),
                    field: "endpoint",
                });
            }
            if let Some(ref method) = transport.method {
                if HttpMethod::parse(method).is_none() {
                    errors.push(ValidationError::InvalidValue {
                        item_name: name.to_string(),
                        field: "method",
                        value: method.clone(),
                        expected: "GET, POST, PUT, DELETE, or PATCH",
                    });
                }
            }
        }
        Some("channel") => {
            if transport.event_name.is_none() {
                errors.push(ValidationError::MissingRequired {
                    item_kind: "action",
                    item_name: name.to_string(),
                    field: "event_name",
                });
            }
        }
        Some(other) => errors.push(ValidationError::InvalidValue {
            item_name: name.to_string(),
            field: "type",
            value: other.to_string(),
            expected: "rest or channel",
        }),
        None => {
            if transport.endpoint.is_some() && transport.event_name.is_some() {
                errors.push(ValidationError::AmbiguousTransport {
                    item_name: name.to_string(),
                });
            } else {
                errors.push(ValidationError::MissingRequired {
                    item_kind: "action",
                    item_name: name.to_string(),
                    field: "type",
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
