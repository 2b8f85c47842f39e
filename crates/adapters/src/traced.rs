// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::channel::{ChannelAdapter, ChannelError};
use crate::http::{HttpAdapter, HttpError, RestRequest};
use async_trait::async_trait;
use relay_core::channel::ChannelRouter;
use relay_core::envelope::Envelope;
use serde_json::Value;
use tracing::Instrument;

/// Wrapper that adds tracing to any HttpAdapter
#[derive(Clone)]
pub struct TracedHttpAdapter<H> {
    inner: H,
}

impl<H> TracedHttpAdapter<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<H: HttpAdapter> HttpAdapter for TracedHttpAdapter<H> {
    async fn execute(&self, request: &RestRequest) -> Result<Value, HttpError> {
        let span = tracing::info_span!(
            "http.execute",
            endpoint = %request.endpoint,
            method = %request.method
        );
        async {
            tracing::info!(payload_keys = request.payload.len(), "dispatching");

            // Precondition: endpoint must be non-empty
            if request.endpoint.is_empty() {
                tracing::error!("endpoint is empty");
                return Err(HttpError::Request("endpoint is empty".to_string()));
            }

            let start = std::time::Instant::now();
            let result = self.inner.execute(request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(_) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request succeeded"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "request failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ChannelAdapter
#[derive(Clone)]
pub struct TracedChannelAdapter<C> {
    inner: C,
}

impl<C> TracedChannelAdapter<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: ChannelAdapter> ChannelAdapter for TracedChannelAdapter<C> {
    async fn connect(&self) -> Result<(), ChannelError> {
        let span = tracing::info_span!("channel.connect");
        async {
            tracing::info!("connecting");

            let start = std::time::Instant::now();
            let result = self.inner.connect().await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "connected"),
                Err(e) => {
                    tracing::error!(elapsed_ms = elapsed.as_millis() as u64, error = %e, "failed")
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn publish(&self, envelope: &Envelope) -> Result<(), ChannelError> {
        let span = tracing::info_span!("channel.publish", event = %envelope.event);
        async {
            let result = self.inner.publish(envelope).await;
            match &result {
                Ok(()) => tracing::debug!("published"),
                Err(e) => tracing::error!(error = %e, "publish failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn wait_disconnected(&self) -> String {
        let reason = self.inner.wait_disconnected().await;
        tracing::info!(reason, "channel disconnected");
        reason
    }

    async fn close(&self) {
        self.inner.close().await;
        tracing::info!("channel closed");
    }

    fn router(&self) -> &ChannelRouter {
        self.inner.router()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
