// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle for the shared persistent channel
//!
//! One channel is shared by every channel-backed trigger. The machine
//! reconnects on its own after drops and failed attempts, backing off
//! exponentially from [`RECONNECT_BASE`] up to [`RECONNECT_CAP`].

use crate::effect::{Effect, Event};
use std::fmt;
use std::time::Duration;

/// Delay before the first reconnect attempt
pub const RECONNECT_BASE: Duration = Duration::from_millis(500);
/// Longest delay between reconnect attempts
pub const RECONNECT_CAP: Duration = Duration::from_secs(30);
/// Timer id for scheduled reconnects
pub const RECONNECT_TIMER: &str = "channel:reconnect";

/// Connection status of the shared channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Connecting,
    Open,
    Closed,
    Failed,
}

impl ChannelStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelStatus::Connecting => "connecting",
            ChannelStatus::Open => "open",
            ChannelStatus::Closed => "closed",
            ChannelStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Inputs to the connection state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Begin connecting
    Start,
    /// The transport reported an established connection
    Opened,
    /// An open connection dropped
    Dropped { reason: String },
    /// A connect attempt failed
    ConnectFailed { error: String },
    /// The reconnect backoff elapsed
    RetryDue,
    /// Stop the connection for good
    Teardown,
}

/// Backoff before reconnect attempt `attempt` (1-based): doubles from
/// [`RECONNECT_BASE`], capped at [`RECONNECT_CAP`].
pub fn reconnect_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(6);
    let delay = RECONNECT_BASE * 2u32.pow(exponent);
    delay.min(RECONNECT_CAP)
}

/// State of the shared channel connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConnection {
    pub status: ChannelStatus,
    /// Consecutive failed attempts since the last successful open
    pub connect_attempts: u32,
}

impl ChannelConnection {
    pub fn new() -> Self {
        Self {
            status: ChannelStatus::Closed,
            connect_attempts: 0,
        }
    }

    /// Consume one event, producing the next state and its effects
    pub fn transition(&self, event: ChannelEvent) -> (Self, Vec<Effect>) {
        match (self.status, event) {
            (ChannelStatus::Closed | ChannelStatus::Failed, ChannelEvent::Start)
            | (ChannelStatus::Closed | ChannelStatus::Failed, ChannelEvent::RetryDue) => {
                let mut next = self.clone();
                next.status = ChannelStatus::Connecting;
                (
                    next,
                    vec![Effect::Emit(Event::ChannelConnecting {
                        attempt: self.connect_attempts + 1,
                    })],
                )
            }
            (ChannelStatus::Connecting, ChannelEvent::Opened) => {
                let mut next = self.clone();
                next.status = ChannelStatus::Open;
                next.connect_attempts = 0;
                (next, vec![Effect::Emit(Event::ChannelOpened)])
            }
            (ChannelStatus::Connecting, ChannelEvent::ConnectFailed { error }) => {
                let mut next = self.clone();
                next.status = ChannelStatus::Failed;
                next.connect_attempts = self.connect_attempts + 1;
                let delay = reconnect_delay(next.connect_attempts);
                let effects = vec![
                    Effect::Emit(Event::ChannelFailed { error }),
                    Effect::Emit(Event::ReconnectScheduled {
                        attempt: next.connect_attempts,
                        delay_ms: delay.as_millis() as u64,
                    }),
                    Effect::SetTimer {
                        id: RECONNECT_TIMER.to_string(),
                        duration: delay,
                    },
                ];
                (next, effects)
            }
            (ChannelStatus::Open, ChannelEvent::Dropped { reason }) => {
                let mut next = self.clone();
                next.status = ChannelStatus::Closed;
                next.connect_attempts = 1;
                let delay = reconnect_delay(1);
                let effects = vec![
                    Effect::Emit(Event::ChannelClosed { reason }),
                    Effect::Emit(Event::ReconnectScheduled {
                        attempt: 1,
                        delay_ms: delay.as_millis() as u64,
                    }),
                    Effect::SetTimer {
                        id: RECONNECT_TIMER.to_string(),
                        duration: delay,
                    },
                ];
                (next, effects)
            }
            (_, ChannelEvent::Teardown) => {
                let mut next = self.clone();
                next.status = ChannelStatus::Closed;
                next.connect_attempts = 0;
                let effects = vec![
                    Effect::CancelTimer {
                        id: RECONNECT_TIMER.to_string(),
                    },
                    Effect::Emit(Event::ChannelClosed {
                        reason: "teardown".to_string(),
                    }),
                ];
                (next, effects)
            }
            _ => (self.clone(), vec![]),
        }
    }
}

impl Default for ChannelConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
