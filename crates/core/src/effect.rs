// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events for state machine orchestration

use crate::action::{ActionId, TransportKind};
use crate::controller::ControllerId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Effects are side effects that state machines request
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Emit an event for other components to observe
    Emit(Event),
    /// Dispatch the controller's action over its resolved transport
    Dispatch {
        controller: ControllerId,
        action: ActionId,
        payload: Map<String, Value>,
    },
    /// Start (or restart) a named timer
    SetTimer { id: String, duration: Duration },
    /// Cancel a named timer if it is still pending
    CancelTimer { id: String },
    /// Log a message
    Log { level: LogLevel, message: String },
}

impl Effect {
    /// Short operation name for tracing spans
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Emit(_) => "emit",
            Effect::Dispatch { .. } => "dispatch",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::Log { .. } => "log",
        }
    }

    /// Structured fields for tracing
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Emit(event) => vec![("event", event.name())],
            Effect::Dispatch {
                controller, action, ..
            } => vec![
                ("controller", controller.to_string()),
                ("action", action.to_string()),
            ],
            Effect::SetTimer { id, duration } => vec![
                ("id", id.clone()),
                ("duration_ms", duration.as_millis().to_string()),
            ],
            Effect::CancelTimer { id } => vec![("id", id.clone())],
            Effect::Log { message, .. } => vec![("message", message.clone())],
        }
    }
}

/// Log levels for the Log effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Events are facts emitted by state machines for observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A trigger is armed and waiting for a second press
    ConfirmationPending { controller: String },
    /// The confirmation window closed without a second press
    ConfirmationExpired { controller: String },
    /// A dispatch attempt started
    DispatchStarted {
        controller: String,
        action: String,
        transport: TransportKind,
        attempt: u32,
    },
    /// Progress reported for an in-flight action
    ActionProgress { controller: String, percent: u8 },
    /// The action completed successfully
    ActionSucceeded {
        controller: String,
        action: String,
        message: Option<String>,
    },
    /// The action failed with no retry remaining
    ActionFailed {
        controller: String,
        action: String,
        error: String,
    },
    /// A failed attempt will be retried after a backoff delay
    RetryScheduled {
        controller: String,
        attempt: u32,
        delay_ms: u64,
    },
    /// An activation was ignored
    ActivationRejected { controller: String, reason: String },
    /// A terminal phase drained back to Idle
    ControllerReset { controller: String },
    /// The shared channel started connecting
    ChannelConnecting { attempt: u32 },
    /// The shared channel is open
    ChannelOpened,
    /// The shared channel dropped
    ChannelClosed { reason: String },
    /// A connect attempt failed
    ChannelFailed { error: String },
    /// A reconnect attempt is scheduled after a backoff delay
    ReconnectScheduled { attempt: u32, delay_ms: u64 },
}

impl Event {
    /// Event name for pattern-based subscription matching
    pub fn name(&self) -> String {
        match self {
            Event::ConfirmationPending { .. } => "confirmation:pending".to_string(),
            Event::ConfirmationExpired { .. } => "confirmation:expired".to_string(),
            Event::DispatchStarted { .. } => "dispatch:started".to_string(),
            Event::ActionProgress { .. } => "action:progress".to_string(),
            Event::ActionSucceeded { .. } => "action:succeeded".to_string(),
            Event::ActionFailed { .. } => "action:failed".to_string(),
            Event::RetryScheduled { .. } => "retry:scheduled".to_string(),
            Event::ActivationRejected { .. } => "activation:rejected".to_string(),
            Event::ControllerReset { .. } => "controller:reset".to_string(),
            Event::ChannelConnecting { .. } => "channel:connecting".to_string(),
            Event::ChannelOpened => "channel:opened".to_string(),
            Event::ChannelClosed { .. } => "channel:closed".to_string(),
            Event::ChannelFailed { .. } => "channel:failed".to_string(),
            Event::ReconnectScheduled { .. } => "channel:reconnect".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
