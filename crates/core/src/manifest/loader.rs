// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest loader: converts validated manifests to registry types.
//!
//! This module converts `RawManifest` entries into [`ActionDescriptor`]s
//! and collects them into an [`ActionRegistry`]. TOML payload tables are
//! converted to JSON here so the rest of the system never sees TOML types.
//!
//! # Example
//!
//! ```ignore
//! use relay_core::manifest::{parse_manifest, validate_manifest, load_manifest};
//!
//! let raw = parse_manifest(toml_content)?;
//! let validated = validate_manifest(&raw)?;
//! let registry = load_manifest(&validated)?;
//! ```

use super::parser::{parse_manifest, parse_manifest_file, ParseError};
use super::types::{RawAction, RawTransport};
use super::validator::{validate_manifest, ValidatedManifest, ValidationErrors};
use crate::action::{ActionDescriptor, ActionLabels, ActionRegistry, HttpMethod, Transport};
use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during manifest loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Validation error
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Registry rejected an entry
    #[error("Registry error: {0}")]
    Registry(#[from] ConfigError),

    /// Default payload not representable as JSON
    #[error("Invalid default_payload in action '{action}': {source}")]
    Payload {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid value in field
    #[error("Invalid value '{value}' in {field}: expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// Missing required field
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },
}

/// Load a validated manifest into an action registry.
pub fn load_manifest(validated: &ValidatedManifest) -> Result<ActionRegistry, LoadError> {
    let mut registry = ActionRegistry::new();
    for (name, action) in &validated.raw.action {
        registry.insert(load_action(name, action)?)?;
    }
    Ok(registry)
}

/// Parse, validate, and load a manifest from TOML string content.
pub fn load_manifest_str(content: &str) -> Result<ActionRegistry, LoadError> {
    let raw = parse_manifest(content)?;
    let validated = validate_manifest(&raw)?;
    load_manifest(&validated)
}

/// Parse, validate, and load a manifest from a TOML file.
pub fn load_manifest_file(path: &Path) -> Result<ActionRegistry, LoadError> {
    let raw = parse_manifest_file(path)?;
    let validated = validate_manifest(&raw)?;
    load_manifest(&validated)
}

fn load_action(name: &str, raw: &RawAction) -> Result<ActionDescriptor, LoadError> {
    let label = raw.label.clone().ok_or_else(|| LoadError::MissingField {
        field: "label".to_string(),
        context: format!("action '{}'", name),
    })?;

    let mut labels = ActionLabels::new(label);
    if let Some(ref loading) = raw.loading {
        labels = labels.with_loading(loading.clone());
    }
    if let Some(ref success) = raw.success {
        labels = labels.with_success(success.clone());
    }
    if let Some(ref error) = raw.error {
        labels = labels.with_error(error.clone());
    }

    let transport = raw.transport.as_ref().ok_or_else(|| LoadError::MissingField {
        field: "transport".to_string(),
        context: format!("action '{}'", name),
    })?;

    Ok(ActionDescriptor::new(
        name,
        labels,
        load_transport(name, transport)?,
    ))
}

fn load_transport(name: &str, raw: &RawTransport) -> Result<Transport, LoadError> {
    match raw.resolved_type() {
        Some("rest") => {
            let endpoint = raw.endpoint.clone().ok_or_else(|| LoadError::MissingField {
                field: "endpoint".to_string(),
                context: format!("action '{}'", name),
            })?;
            let method = match raw.method {
                Some(ref method) => {
                    HttpMethod::parse(method).ok_or_else(|| LoadError::InvalidValue {
                        field: format!("action '{}' method", name),
                        value: method.clone(),
                        expected: "GET, POST, PUT, DELETE, or PATCH".to_string(),
                    })?
                }
                None => HttpMethod::Post,
            };
            let default_payload = match raw.default_payload {
                Some(ref table) => json_payload(name, table)?,
                None => Map::new(),
            };
            Ok(Transport::Rest {
                endpoint,
                method,
                default_payload,
            })
        }
        Some("channel") => {
            let event_name = raw.event_name.clone().ok_or_else(|| LoadError::MissingField {
                field: "event_name".to_string(),
                context: format!("action '{}'", name),
            })?;
            Ok(Transport::Channel { event_name })
        }
        Some(other) => Err(LoadError::InvalidValue {
            field: format!("action '{}' type", name),
            value: other.to_string(),
            expected: "rest or channel".to_string(),
        }),
        None => Err(LoadError::MissingField {
            field: "type".to_string(),
            context: format!("action '{}' transport", name),
        }),
    }
}

fn json_payload(name: &str, table: &toml::Table) -> Result<Map<String, Value>, LoadError> {
    let mut payload = Map::new();
    for (key, value) in table {
        let json = serde_json::to_value(value.clone()).map_err(|e| LoadError::Payload {
            action: name.to_string(),
            source: e,
        })?;
        payload.insert(key.clone(), json);
    }
    Ok(payload)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
