// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound envelope routing
//!
//! Subscribers register per event name and are invoked in registration
//! order. Handlers run under the router lock and must not re-enter the
//! router; forwarding into an unbounded channel is the expected shape.

use crate::envelope::Envelope;
use crate::events::SubscriberId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

type Handler = Box<dyn Fn(&Envelope) + Send + Sync>;

/// Routes inbound channel envelopes to subscribers by event name
pub struct ChannelRouter {
    inner: Arc<RwLock<HashMap<String, Vec<(SubscriberId, Handler)>>>>,
    next_id: Arc<AtomicU64>,
}

impl ChannelRouter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a handler for an event name
    pub fn subscribe<F>(&self, event_name: impl Into<String>, handler: F) -> SubscriberId
    where
        F: Fn(&Envelope) + Send + Sync + 'static,
    {
        let id = SubscriberId(format!("sub-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner
            .entry(event_name.into())
            .or_default()
            .push((id.clone(), Box::new(handler)));
        id
    }

    /// Subscribe and receive matching envelopes over a channel
    pub fn subscribe_channel(
        &self,
        event_name: impl Into<String>,
    ) -> (SubscriberId, mpsc::UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.subscribe(event_name, move |envelope: &Envelope| {
            let _ = tx.send(envelope.clone());
        });
        (id, rx)
    }

    /// Remove one subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: &SubscriberId) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let mut removed = false;
        inner.retain(|_, handlers| {
            let before = handlers.len();
            handlers.retain(|(sub_id, _)| sub_id != id);
            removed |= handlers.len() != before;
            !handlers.is_empty()
        });
        removed
    }

    /// Deliver an envelope to every subscriber of its event name.
    /// Returns how many handlers ran.
    pub fn dispatch(&self, envelope: &Envelope) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let Some(handlers) = inner.get(&envelope.event) else {
            return 0;
        };
        for (_, handler) in handlers {
            handler(envelope);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, event_name: &str) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.get(event_name).map_or(0, Vec::len)
    }

    /// Drop every subscriber
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.clear();
    }
}

impl Default for ChannelRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ChannelRouter {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
