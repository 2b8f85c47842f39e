// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel wire envelope and outbound action messages

use crate::error::ChannelParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single channel message: event name plus arbitrary JSON data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Decode a raw frame payload
    pub fn decode(bytes: &[u8]) -> Result<Self, ChannelParseError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode for framing
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// The message published when a channel-backed trigger dispatches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundAction {
    /// Correlation id, unique per dispatch
    pub id: String,
    pub action: String,
    pub payload: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl OutboundAction {
    pub fn new(
        id: impl Into<String>,
        action: impl Into<String>,
        payload: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Wrap into an envelope carried under the given event name
    pub fn into_envelope(self, event_name: &str) -> Result<Envelope, serde_json::Error> {
        Ok(Envelope::new(event_name, serde_json::to_value(self)?))
    }
}

/// Lifecycle event name carrying progress for a dispatch
pub fn progress_event(event_name: &str) -> String {
    format!("{event_name}:progress")
}

/// Lifecycle event name signalling success of a dispatch
pub fn success_event(event_name: &str) -> String {
    format!("{event_name}:success")
}

/// Lifecycle event name signalling failure of a dispatch
pub fn error_event(event_name: &str) -> String {
    format!("{event_name}:error")
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
