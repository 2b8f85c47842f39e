// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake HTTP adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{HttpAdapter, HttpError, RestRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Fake HTTP adapter for testing
///
/// Requests succeed with a null body unless responses are queued.
#[derive(Clone, Default)]
pub struct FakeHttpAdapter {
    calls: Arc<Mutex<Vec<RestRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<Value, HttpError>>>>,
}

impl FakeHttpAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for an upcoming request
    pub fn enqueue_ok(&self, body: Value) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(body));
    }

    /// Queue a failure for an upcoming request
    pub fn enqueue_err(&self, error: HttpError) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
    }

    /// Get all recorded requests
    pub fn calls(&self) -> Vec<RestRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl HttpAdapter for FakeHttpAdapter {
    async fn execute(&self, request: &RestRequest) -> Result<Value, HttpError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
