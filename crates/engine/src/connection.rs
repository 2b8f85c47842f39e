// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared channel connection supervision
//!
//! One supervisor owns the lifecycle of the persistent channel. The pure
//! [`ChannelConnection`] machine decides what happens; the supervisor
//! interprets its status changes by spawning connect attempts and drop
//! watchers, which report back through the runtime's message queue.

use crate::RuntimeMsg;
use relay_adapters::ChannelAdapter;
use relay_core::channel::{ChannelConnection, ChannelEvent, ChannelStatus};
use relay_core::Effect;
use tokio::sync::mpsc;

/// Drives the shared channel connection machine
pub struct ConnectionSupervisor<C> {
    adapter: C,
    machine: ChannelConnection,
    tx: mpsc::UnboundedSender<RuntimeMsg>,
}

impl<C: ChannelAdapter> ConnectionSupervisor<C> {
    pub fn new(adapter: C, tx: mpsc::UnboundedSender<RuntimeMsg>) -> Self {
        Self {
            adapter,
            machine: ChannelConnection::new(),
            tx,
        }
    }

    pub fn status(&self) -> ChannelStatus {
        self.machine.status
    }

    pub fn connection(&self) -> &ChannelConnection {
        &self.machine
    }

    /// Feed one event through the connection machine.
    ///
    /// Returns the machine's effects for the caller to execute. Entering
    /// `Connecting` starts a connect attempt; reaching `Open` starts a
    /// watcher that reports the eventual drop.
    pub fn apply(&mut self, event: ChannelEvent) -> Vec<Effect> {
        let was = self.machine.status;
        let (next, effects) = self.machine.transition(event);
        self.machine = next;

        if was != self.machine.status {
            tracing::debug!(
                from = was.name(),
                to = self.machine.status.name(),
                "channel status changed"
            );
        }

        match (was, self.machine.status) {
            (ChannelStatus::Connecting, ChannelStatus::Connecting) => {}
            (_, ChannelStatus::Connecting) => self.spawn_connect(),
            (ChannelStatus::Connecting, ChannelStatus::Open) => self.spawn_drop_watch(),
            _ => {}
        }

        effects
    }

    fn spawn_connect(&self) {
        let adapter = self.adapter.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = match adapter.connect().await {
                Ok(()) => RuntimeMsg::Channel(ChannelEvent::Opened),
                Err(e) => RuntimeMsg::Channel(ChannelEvent::ConnectFailed {
                    error: e.to_string(),
                }),
            };
            let _ = tx.send(msg);
        });
    }

    fn spawn_drop_watch(&self) {
        let adapter = self.adapter.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let reason = adapter.wait_disconnected().await;
            let _ = tx.send(RuntimeMsg::Channel(ChannelEvent::Dropped { reason }));
        });
    }

    /// Stop the connection for good: tear down the machine, close the
    /// adapter, and drop every router subscription.
    pub async fn teardown(&mut self) -> Vec<Effect> {
        let effects = self.apply(ChannelEvent::Teardown);
        self.adapter.close().await;
        self.adapter.router().clear();
        effects
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
