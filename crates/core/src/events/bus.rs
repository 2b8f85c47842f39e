// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for routing events to subscribers

use super::subscription::{SubscriberId, Subscription};
use crate::effect::Event;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<Event>;
/// Receiver handed to subscribers
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Routes events to subscribers whose patterns match
pub struct EventBus {
    subscribers: Arc<RwLock<HashMap<SubscriberId, (Subscription, EventSender)>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a subscriber, returning its receiving end
    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subscribers.insert(subscription.id.clone(), (subscription, tx));
        rx
    }

    /// Remove a subscriber
    pub fn unsubscribe(&self, id: &SubscriberId) {
        let mut subscribers = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subscribers.remove(id);
    }

    /// Deliver an event to every subscriber whose patterns match.
    /// A send failure means the receiver is gone; those are ignored.
    pub fn publish(&self, event: Event) {
        let name = event.name();
        let subscribers = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        for (subscription, tx) in subscribers.values() {
            if subscription.matches(&name) {
                let _ = tx.send(event.clone());
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        let subscribers = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
