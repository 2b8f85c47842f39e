// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error types for trigger configuration and transports

use crate::action::ActionId;
use thiserror::Error;

/// Errors resolving trigger configuration into a runnable controller
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown action: {0}")]
    UnknownAction(ActionId),
    #[error("duplicate action: {0}")]
    DuplicateAction(ActionId),
    #[error("no transport configured for action: {0}")]
    NoTransport(ActionId),
}

/// A transport-level dispatch failure as surfaced to the controller
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An inbound channel frame whose payload could not be decoded
#[derive(Debug, Error)]
#[error("invalid channel message: {0}")]
pub struct ChannelParseError(#[from] pub serde_json::Error);
