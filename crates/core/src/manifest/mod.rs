// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest parsing, validation, and loading.
//!
//! A manifest is a TOML file that declares the actions a surface may
//! trigger, with their labels and transport bindings. This module
//! provides:
//!
//! - **types**: Raw data types that mirror TOML structure
//! - **parser**: TOML parsing (syntactic layer)
//! - **validator**: Semantic validation
//! - **loader**: Conversion into an [`ActionRegistry`](crate::action::ActionRegistry)
//!
//! # Architecture
//!
//! ```text
//! TOML file → parser → RawManifest → validator → ValidatedManifest → loader → ActionRegistry
//! ```
//!
//! # Example
//!
//! ```ignore
//! use relay_core::manifest::load_manifest_str;
//!
//! let registry = load_manifest_str(r#"
//!     [action.save]
//!     label = "Save"
//!
//!     [action.save.transport]
//!     type = "rest"
//!     endpoint = "/api/save"
//! "#)?;
//! ```

pub mod loader;
pub mod parser;
pub mod types;
pub mod validator;

// Re-export commonly used items
pub use loader::{load_manifest, load_manifest_file, load_manifest_str, LoadError};
pub use parser::{parse_manifest, parse_manifest_file, ParseError};
pub use types::{RawAction, RawManifest, RawTransport};
pub use validator::{validate_manifest, ValidatedManifest, ValidationError, ValidationErrors};
