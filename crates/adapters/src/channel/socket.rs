// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel adapter over a TCP socket

use super::frame::{read_frame, write_frame, FrameError};
use super::{ChannelAdapter, ChannelError};
use async_trait::async_trait;
use relay_core::channel::ChannelRouter;
use relay_core::envelope::Envelope;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Channel adapter speaking length-prefixed JSON envelopes over TCP.
///
/// Each connection gets one read loop that fans inbound envelopes out
/// through the router. Reconnect policy lives with the caller; `connect`
/// may be called again after a drop.
#[derive(Clone)]
pub struct SocketChannel {
    addr: String,
    router: ChannelRouter,
    inner: Arc<Inner>,
}

struct Inner {
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,
    reader_task: Mutex<Option<JoinHandle<()>>>,
    // Bumped on connect and close so stale read loops stay quiet
    generation: AtomicU64,
    disconnects_tx: watch::Sender<(u64, String)>,
}

impl SocketChannel {
    pub fn new(addr: impl Into<String>) -> Self {
        let (disconnects_tx, _) = watch::channel((0, String::new()));
        Self {
            addr: addr.into(),
            router: ChannelRouter::new(),
            inner: Arc::new(Inner {
                writer: tokio::sync::Mutex::new(None),
                reader_task: Mutex::new(None),
                generation: AtomicU64::new(0),
                disconnects_tx,
            }),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn spawn_read_loop(&self, mut read_half: OwnedReadHalf, generation: u64) -> JoinHandle<()> {
        let router = self.router.clone();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let reason = loop {
                match read_frame(&mut read_half).await {
                    Ok(payload) => match Envelope::decode(&payload) {
                        Ok(envelope) => {
                            let delivered = router.dispatch(&envelope);
                            tracing::trace!(event = %envelope.event, delivered, "inbound envelope");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "dropping undecodable frame");
                        }
                    },
                    Err(e) => break disconnect_reason(&e),
                }
            };

            // Only the read loop of the live connection reports the drop
            if inner.generation.load(Ordering::SeqCst) == generation {
                *inner.writer.lock().await = None;
                let _ = inner.disconnects_tx.send((generation, reason));
            }
        })
    }

    fn abort_reader(&self) {
        let task = self
            .inner
            .reader_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

#[async_trait]
impl ChannelAdapter for SocketChannel {
    async fn connect(&self) -> Result<(), ChannelError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        let (read_half, write_half) = stream.into_split();

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_reader();
        *self.inner.writer.lock().await = Some(write_half);

        let task = self.spawn_read_loop(read_half, generation);
        *self
            .inner
            .reader_task
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(task);

        tracing::debug!(addr = %self.addr, "channel connected");
        Ok(())
    }

    async fn publish(&self, envelope: &Envelope) -> Result<(), ChannelError> {
        let bytes = envelope.encode()?;
        let mut writer = self.inner.writer.lock().await;
        match writer.as_mut() {
            Some(w) => {
                write_frame(w, &bytes).await?;
                Ok(())
            }
            None => Err(ChannelError::NotOpen),
        }
    }

    async fn wait_disconnected(&self) -> String {
        let mut rx = self.inner.disconnects_tx.subscribe();

        // A drop the read loop already reported for the live connection
        // counts; without this check a drop racing this call is missed.
        let (generation, reason) = rx.borrow_and_update().clone();
        if generation != 0 && generation == self.inner.generation.load(Ordering::SeqCst) {
            return reason;
        }

        if rx.changed().await.is_err() {
            return "channel torn down".to_string();
        }
        let (_, reason) = rx.borrow().clone();
        reason
    }

    async fn close(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.abort_reader();
        *self.inner.writer.lock().await = None;
        tracing::debug!(addr = %self.addr, "channel closed");
    }

    fn router(&self) -> &ChannelRouter {
        &self.router
    }
}

fn disconnect_reason(error: &FrameError) -> String {
    match error {
        FrameError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            "connection closed by server".to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "socket_tests.rs"]
mod tests;
