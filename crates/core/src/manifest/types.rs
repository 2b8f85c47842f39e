// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw manifest types that mirror TOML structure exactly.
//!
//! These types are used for parsing only. They are converted to registry
//! types by the loader after validation.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A manifest declaring triggerable actions.
///
/// Keys are action names; ordering is kept stable so validation errors
/// come out in a predictable order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawManifest {
    /// Named actions available to trigger surfaces
    pub action: BTreeMap<String, RawAction>,
}

/// A single action entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAction {
    /// Idle label shown on the trigger (required)
    pub label: Option<String>,
    /// Label while the action is in flight
    pub loading: Option<String>,
    /// Label after the action completes
    pub success: Option<String>,
    /// Label after the action fails
    pub error: Option<String>,
    /// How dispatches reach the backend (required)
    pub transport: Option<RawTransport>,
}

/// Transport binding for an action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTransport {
    /// "rest" or "channel"; empty means infer from the populated fields
    #[serde(rename = "type")]
    pub transport_type: String,
    /// Request path or URL (rest)
    pub endpoint: Option<String>,
    /// HTTP method (rest, defaults to POST)
    pub method: Option<String>,
    /// Payload fields merged under trigger-supplied ones (rest)
    pub default_payload: Option<toml::Table>,
    /// Event name dispatches are published under (channel)
    pub event_name: Option<String>,
}

impl RawTransport {
    /// Transport type after inference.
    ///
    /// An explicit `type` wins. Otherwise the populated field decides:
    /// `endpoint` means rest, `event_name` means channel. Returns `None`
    /// when neither or both are set without an explicit type.
    pub fn resolved_type(&self) -> Option<&str> {
        if !self.transport_type.is_empty() {
            return Some(self.transport_type.as_str());
        }
        match (self.endpoint.is_some(), self.event_name.is_some()) {
            (true, false) => Some("rest"),
            (false, true) => Some("channel"),
            _ => None,
        }
    }
}
