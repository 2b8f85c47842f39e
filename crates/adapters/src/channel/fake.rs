// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake channel adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ChannelAdapter, ChannelError};
use async_trait::async_trait;
use relay_core::channel::ChannelRouter;
use relay_core::envelope::Envelope;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Fake channel adapter for testing
///
/// Connects instantly, records published envelopes, and lets tests
/// inject inbound envelopes or drop the connection on demand.
#[derive(Clone)]
pub struct FakeChannelAdapter {
    router: ChannelRouter,
    published: Arc<Mutex<Vec<Envelope>>>,
    connected: Arc<AtomicBool>,
    connect_errors: Arc<Mutex<VecDeque<String>>>,
    disconnects_tx: Arc<watch::Sender<(u64, String)>>,
    drop_seq: Arc<AtomicU64>,
}

impl Default for FakeChannelAdapter {
    fn default() -> Self {
        let (disconnects_tx, _) = watch::channel((0, String::new()));
        Self {
            router: ChannelRouter::new(),
            published: Arc::new(Mutex::new(Vec::new())),
            connected: Arc::new(AtomicBool::new(false)),
            connect_errors: Arc::new(Mutex::new(VecDeque::new())),
            disconnects_tx: Arc::new(disconnects_tx),
            drop_seq: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl FakeChannelAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a failure for an upcoming connect attempt
    pub fn enqueue_connect_error(&self, error: impl Into<String>) {
        self.connect_errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(error.into());
    }

    /// Get all published envelopes
    pub fn published(&self) -> Vec<Envelope> {
        self.published
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Deliver an inbound envelope as if the server pushed it
    pub fn inject(&self, envelope: &Envelope) -> usize {
        self.router.dispatch(envelope)
    }

    /// Drop the connection, releasing `wait_disconnected`
    pub fn drop_connection(&self, reason: impl Into<String>) {
        self.connected.store(false, Ordering::SeqCst);
        let seq = self.drop_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.disconnects_tx.send((seq, reason.into()));
    }
}

#[async_trait]
impl ChannelAdapter for FakeChannelAdapter {
    async fn connect(&self) -> Result<(), ChannelError> {
        let queued = self
            .connect_errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(error) = queued {
            return Err(ChannelError::Connect(error));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn publish(&self, envelope: &Envelope) -> Result<(), ChannelError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(ChannelError::NotOpen);
        }
        self.published
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(envelope.clone());
        Ok(())
    }

    async fn wait_disconnected(&self) -> String {
        let mut rx = self.disconnects_tx.subscribe();
        // A drop that already happened would otherwise be missed, since
        // subscribing marks the latest value as seen.
        let (seq, reason) = rx.borrow_and_update().clone();
        if seq != 0
            && seq == self.drop_seq.load(Ordering::SeqCst)
            && !self.connected.load(Ordering::SeqCst)
        {
            return reason;
        }
        if rx.changed().await.is_err() {
            return "channel torn down".to_string();
        }
        let (_, reason) = rx.borrow().clone();
        reason
    }

    async fn close(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn router(&self) -> &ChannelRouter {
        &self.router
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
