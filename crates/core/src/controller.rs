// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger controller state machine
//!
//! A controller owns the lifecycle of one mounted trigger:
//! `Idle -> Loading -> Success | Error -> Idle`. Activations pass through
//! two gates before dispatching (debounce, then confirmation), failures
//! feed a linear-backoff retry loop, and terminal phases drain back to
//! Idle on a timer. Transitions are pure; all side effects are returned
//! as [`Effect`] values for the engine to interpret.

use crate::action::{ActionId, Transport, TriggerOptions};
use crate::clock::Clock;
use crate::effect::{Effect, Event};
use serde_json::{Map, Value};
use std::fmt;
use std::time::{Duration, Instant};

/// Debounce window applied between activations
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// How long an armed confirmation waits for the second press
pub const CONFIRMATION_WINDOW: Duration = Duration::from_secs(5);
/// How long Success is displayed before draining back to Idle
pub const SUCCESS_RESET: Duration = Duration::from_secs(2);
/// How long Error is displayed before draining back to Idle
pub const ERROR_RESET: Duration = Duration::from_secs(3);
/// Unit of linear retry backoff, multiplied by the attempt number
pub const RETRY_BACKOFF_UNIT: Duration = Duration::from_millis(1000);

/// Identifier of a mounted controller
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerId(pub String);

impl ControllerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ControllerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ControllerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle phase of a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Success => "success",
            Phase::Error => "error",
        }
    }

    /// Success and Error are display phases that drain back to Idle
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Success | Phase::Error)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Dispatch gates and retry policy for one trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerPolicy {
    pub debounce: Duration,
    pub require_confirmation: bool,
    pub auto_retry: bool,
    pub max_retries: u32,
    pub show_progress: bool,
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            require_confirmation: false,
            auto_retry: false,
            max_retries: 3,
            show_progress: false,
        }
    }
}

impl From<&TriggerOptions> for TriggerPolicy {
    fn from(options: &TriggerOptions) -> Self {
        Self {
            debounce: options.debounce,
            require_confirmation: options.require_confirmation,
            auto_retry: options.auto_retry,
            max_retries: options.max_retries,
            show_progress: options.show_progress,
        }
    }
}

/// Observable state of one trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionState {
    pub phase: Phase,
    /// Progress percentage, 0 to 100
    pub progress: u8,
    pub retry_count: u32,
    /// When the most recent activation passed the debounce gate
    pub last_invoked_at: Option<Instant>,
    pub pending_confirmation: bool,
    pub last_error: Option<String>,
}

impl ActionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            progress: 0,
            retry_count: 0,
            last_invoked_at: None,
            pending_confirmation: false,
            last_error: None,
        }
    }
}

impl Default for ActionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs consumed by the controller state machine
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// The trigger was pressed
    Activate { payload: Map<String, Value> },
    /// The confirmation window elapsed without a second press
    ConfirmExpired,
    /// The transport reported success
    DispatchSucceeded { message: Option<String> },
    /// The transport reported failure
    DispatchFailed { error: String },
    /// The transport reported progress
    Progress { percent: u8 },
    /// The retry backoff elapsed
    RetryDue,
    /// The terminal display window elapsed
    ResetDue,
}

/// One mounted trigger: identity, transport, policy, and live state
#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    pub id: ControllerId,
    pub action: ActionId,
    pub transport: Transport,
    pub policy: TriggerPolicy,
    pub state: ActionState,
    /// Payload of the in-flight dispatch, re-sent on retry
    dispatch_payload: Map<String, Value>,
}

impl Controller {
    pub fn new(
        id: impl Into<ControllerId>,
        action: ActionId,
        transport: Transport,
        policy: TriggerPolicy,
    ) -> Self {
        Self {
            id: id.into(),
            action,
            transport,
            policy,
            state: ActionState::new(),
            dispatch_payload: Map::new(),
        }
    }

    pub fn confirm_timer_id(&self) -> String {
        format!("controller:{}:confirm", self.id)
    }

    pub fn retry_timer_id(&self) -> String {
        format!("controller:{}:retry", self.id)
    }

    pub fn reset_timer_id(&self) -> String {
        format!("controller:{}:reset", self.id)
    }

    /// Prefix shared by all of this controller's timers
    pub fn timer_prefix(&self) -> String {
        format!("controller:{}:", self.id)
    }

    /// Consume one event, producing the next controller and its effects
    pub fn transition(&self, event: ControllerEvent, clock: &impl Clock) -> (Self, Vec<Effect>) {
        match (self.state.phase, event) {
            (Phase::Idle, ControllerEvent::Activate { payload }) => {
                self.handle_activate(payload, clock)
            }
            (Phase::Idle, ControllerEvent::ConfirmExpired) => self.handle_confirm_expired(),
            (Phase::Loading, ControllerEvent::Progress { percent }) => self.handle_progress(percent),
            (Phase::Loading, ControllerEvent::DispatchSucceeded { message }) => {
                self.handle_success(message)
            }
            (Phase::Loading, ControllerEvent::DispatchFailed { error }) => self.handle_failure(error),
            (Phase::Error, ControllerEvent::RetryDue) => self.handle_retry_due(),
            (Phase::Success | Phase::Error, ControllerEvent::ResetDue) => self.handle_reset(),
            (Phase::Loading, ControllerEvent::Activate { .. }) => {
                self.reject_activation("already dispatching")
            }
            (Phase::Success | Phase::Error, ControllerEvent::Activate { .. }) => {
                self.reject_activation("cooling down")
            }
            _ => (self.clone(), vec![]),
        }
    }

    fn handle_activate(
        &self,
        payload: Map<String, Value>,
        clock: &impl Clock,
    ) -> (Self, Vec<Effect>) {
        // Gate 1, debounce: a press inside the window is dropped silently
        if let Some(last) = self.state.last_invoked_at {
            if clock.now().saturating_duration_since(last) < self.policy.debounce {
                return (self.clone(), vec![]);
            }
        }

        // Gate 2, confirmation: the first press arms, the second dispatches
        if self.policy.require_confirmation && !self.state.pending_confirmation {
            let mut next = self.clone();
            next.state.pending_confirmation = true;
            next.state.last_invoked_at = Some(clock.now());
            let effects = vec![
                Effect::SetTimer {
                    id: self.confirm_timer_id(),
                    duration: CONFIRMATION_WINDOW,
                },
                Effect::Emit(Event::ConfirmationPending {
                    controller: self.id.0.clone(),
                }),
            ];
            return (next, effects);
        }

        self.dispatch(payload, clock)
    }

    fn dispatch(&self, payload: Map<String, Value>, clock: &impl Clock) -> (Self, Vec<Effect>) {
        let was_pending = self.state.pending_confirmation;

        let mut next = self.clone();
        next.state.phase = Phase::Loading;
        next.state.progress = 0;
        next.state.retry_count = 0;
        next.state.pending_confirmation = false;
        next.state.last_error = None;
        next.state.last_invoked_at = Some(clock.now());
        next.dispatch_payload = payload.clone();

        let mut effects = Vec::new();
        if was_pending {
            effects.push(Effect::CancelTimer {
                id: self.confirm_timer_id(),
            });
        }
        effects.push(Effect::Emit(Event::DispatchStarted {
            controller: self.id.0.clone(),
            action: self.action.0.clone(),
            transport: self.transport.kind(),
            attempt: 1,
        }));
        effects.push(Effect::Dispatch {
            controller: self.id.clone(),
            action: self.action.clone(),
            payload,
        });
        (next, effects)
    }

    fn handle_confirm_expired(&self) -> (Self, Vec<Effect>) {
        if !self.state.pending_confirmation {
            return (self.clone(), vec![]);
        }
        let mut next = self.clone();
        next.state.pending_confirmation = false;
        (
            next,
            vec![Effect::Emit(Event::ConfirmationExpired {
                controller: self.id.0.clone(),
            })],
        )
    }

    fn handle_progress(&self, percent: u8) -> (Self, Vec<Effect>) {
        let clamped = percent.min(100);
        let mut next = self.clone();
        next.state.progress = clamped;
        (
            next,
            vec![Effect::Emit(Event::ActionProgress {
                controller: self.id.0.clone(),
                percent: clamped,
            })],
        )
    }

    fn handle_success(&self, message: Option<String>) -> (Self, Vec<Effect>) {
        let mut next = self.clone();
        next.state.phase = Phase::Success;
        next.state.progress = 100;
        next.state.retry_count = 0;
        next.state.last_error = None;
        let effects = vec![
            Effect::Emit(Event::ActionSucceeded {
                controller: self.id.0.clone(),
                action: self.action.0.clone(),
                message,
            }),
            Effect::SetTimer {
                id: self.reset_timer_id(),
                duration: SUCCESS_RESET,
            },
        ];
        (next, effects)
    }

    fn handle_failure(&self, error: String) -> (Self, Vec<Effect>) {
        let mut next = self.clone();
        next.state.phase = Phase::Error;
        next.state.last_error = Some(error.clone());

        if self.policy.auto_retry && self.state.retry_count < self.policy.max_retries {
            let attempt = self.state.retry_count + 1;
            next.state.retry_count = attempt;
            let delay = RETRY_BACKOFF_UNIT * attempt;
            let effects = vec![
                Effect::Emit(Event::RetryScheduled {
                    controller: self.id.0.clone(),
                    attempt,
                    delay_ms: delay.as_millis() as u64,
                }),
                Effect::SetTimer {
                    id: self.retry_timer_id(),
                    duration: delay,
                },
            ];
            return (next, effects);
        }

        let effects = vec![
            Effect::Emit(Event::ActionFailed {
                controller: self.id.0.clone(),
                action: self.action.0.clone(),
                error,
            }),
            Effect::SetTimer {
                id: self.reset_timer_id(),
                duration: ERROR_RESET,
            },
        ];
        (next, effects)
    }

    fn handle_retry_due(&self) -> (Self, Vec<Effect>) {
        let mut next = self.clone();
        next.state.phase = Phase::Loading;
        next.state.progress = 0;
        let effects = vec![
            Effect::Emit(Event::DispatchStarted {
                controller: self.id.0.clone(),
                action: self.action.0.clone(),
                transport: self.transport.kind(),
                attempt: self.state.retry_count + 1,
            }),
            Effect::Dispatch {
                controller: self.id.clone(),
                action: self.action.clone(),
                payload: self.dispatch_payload.clone(),
            },
        ];
        (next, effects)
    }

    fn handle_reset(&self) -> (Self, Vec<Effect>) {
        let mut next = self.clone();
        next.state.phase = Phase::Idle;
        next.state.progress = 0;
        next.state.retry_count = 0;
        // last_invoked_at survives so the debounce window spans the reset
        (
            next,
            vec![Effect::Emit(Event::ControllerReset {
                controller: self.id.0.clone(),
            })],
        )
    }

    fn reject_activation(&self, reason: &str) -> (Self, Vec<Effect>) {
        (
            self.clone(),
            vec![Effect::Emit(Event::ActivationRejected {
                controller: self.id.0.clone(),
                reason: reason.to_string(),
            })],
        )
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
