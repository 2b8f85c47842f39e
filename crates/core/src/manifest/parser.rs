// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML parsing for manifests (syntactic layer).
//!
//! This module provides functions to parse raw manifest TOML into
//! `RawManifest` structs. No validation is performed at this layer -
//! that's the job of the validator.

use super::types::RawManifest;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// TOML syntax error
    #[error("TOML syntax error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error reading file
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a manifest from TOML string content.
///
/// # Example
///
/// ```ignore
/// let toml = r#"
/// [action.save]
/// label = "Save"
/// "#;
///
/// let manifest = parse_manifest(toml)?;
/// assert!(manifest.action.contains_key("save"));
/// ```
pub fn parse_manifest(toml_content: &str) -> Result<RawManifest, ParseError> {
    let manifest: RawManifest = toml::from_str(toml_content)?;
    Ok(manifest)
}

/// Parse a manifest from a TOML file.
pub fn parse_manifest_file(path: &Path) -> Result<RawManifest, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_manifest(&content)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
