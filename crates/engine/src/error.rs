// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use crate::ExecuteError;
use relay_core::controller::ControllerId;
use relay_core::error::ConfigError;
use thiserror::Error;

/// Errors that can occur in the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
    #[error("controller not found: {0}")]
    ControllerNotFound(ControllerId),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
