// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent channel adapters
//!
//! A channel is a long-lived socket the engine keeps open for realtime
//! dispatches and server-pushed lifecycle events. Inbound envelopes fan
//! out through the adapter's [`ChannelRouter`].

mod frame;
mod socket;

pub use frame::{read_frame, write_frame, FrameError, MAX_FRAME_LEN};
pub use socket::SocketChannel;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeChannelAdapter;

use async_trait::async_trait;
use relay_core::channel::ChannelRouter;
use relay_core::envelope::Envelope;
use thiserror::Error;

/// Errors from channel operations
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("channel is not open")]
    NotOpen,
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

/// Adapter for a persistent realtime channel
#[async_trait]
pub trait ChannelAdapter: Clone + Send + Sync + 'static {
    /// Open the underlying connection and start the read loop
    async fn connect(&self) -> Result<(), ChannelError>;

    /// Publish an envelope over the open connection
    async fn publish(&self, envelope: &Envelope) -> Result<(), ChannelError>;

    /// Resolve once the current connection drops, with the reason
    async fn wait_disconnected(&self) -> String;

    /// Close the connection and stop the read loop
    async fn close(&self);

    /// Router that fans inbound envelopes out to subscribers
    fn router(&self) -> &ChannelRouter;
}
