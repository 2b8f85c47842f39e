// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notification adapters
//!
//! `CommandNotifier` shells out to the platform notifier (`osascript` on
//! macOS, `notify-send` elsewhere). `NoOpNotifyAdapter` swallows
//! notifications for headless runs.

mod command;

pub use command::CommandNotifier;

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

use async_trait::async_trait;
use relay_core::notify::Notification;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification failed: {0}")]
    Failed(String),
    #[error("notifier exited with error: {0}")]
    Command(String),
}

/// Adapter trait for notification delivery
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    /// Send a notification
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Notify adapter that discards every notification
#[derive(Clone, Debug, Default)]
pub struct NoOpNotifyAdapter;

#[async_trait]
impl NotifyAdapter for NoOpNotifyAdapter {
    async fn notify(&self, _notification: Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}
