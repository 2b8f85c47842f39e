// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP adapter backed by reqwest

use super::{HttpAdapter, HttpError, RestRequest};
use async_trait::async_trait;
use relay_core::action::HttpMethod;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// REST adapter over a shared reqwest client
#[derive(Clone)]
pub struct ReqwestAdapter {
    client: Client,
    base_url: String,
}

impl ReqwestAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(client, base_url)
    }

    /// Use a preconfigured client (custom timeouts, headers, proxies)
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl HttpAdapter for ReqwestAdapter {
    async fn execute(&self, request: &RestRequest) -> Result<Value, HttpError> {
        let url = self.url_for(&request.endpoint);

        // GET carries the payload as query parameters, everything else as a JSON body
        let builder = match request.method {
            HttpMethod::Get => {
                let query: Vec<(String, String)> = request
                    .payload
                    .iter()
                    .map(|(key, value)| (key.clone(), query_value(value)))
                    .collect();
                self.client.get(&url).query(&query)
            }
            method => self
                .client
                .request(to_method(method), &url)
                .json(&request.payload),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::Body(e.to_string()))?;

        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| HttpError::Body(e.to_string()))
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "reqwest_tests.rs"]
mod tests;
