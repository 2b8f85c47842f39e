// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST dispatch adapters

mod reqwest;

pub use self::reqwest::ReqwestAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHttpAdapter;

use async_trait::async_trait;
use relay_core::action::HttpMethod;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from REST dispatches
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Body(String),
}

/// A single REST dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub endpoint: String,
    pub method: HttpMethod,
    pub payload: Map<String, Value>,
}

impl RestRequest {
    pub fn new(
        endpoint: impl Into<String>,
        method: HttpMethod,
        payload: Map<String, Value>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            payload,
        }
    }
}

/// Adapter for REST dispatches
#[async_trait]
pub trait HttpAdapter: Clone + Send + Sync + 'static {
    /// Execute a request and return the decoded response body
    async fn execute(&self, request: &RestRequest) -> Result<Value, HttpError>;
}
