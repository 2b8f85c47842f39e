// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core domain types and pure state machines for triggered actions
//!
//! Everything here is side-effect free. State machines consume events and
//! return `(new_state, Vec<Effect>)`; the engine crate interprets the
//! effects against real transports.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod error;
pub mod id;

// Domain vocabulary
pub mod action;
pub mod effect;
pub mod envelope;
pub mod merge;

// State machines
pub mod channel;
pub mod controller;

// Event routing
pub mod events;

// Configuration and manifests
pub mod config;
pub mod manifest;

// Outward-facing surfaces
pub mod notify;
pub mod presentation;

pub use action::{
    resolve_transport, ActionDescriptor, ActionId, ActionLabels, ActionRegistry, HttpMethod,
    Transport, TransportKind, TriggerOptions,
};
pub use channel::{ChannelConnection, ChannelEvent, ChannelRouter, ChannelStatus};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{NotifyConfig, NotifyRule};
pub use controller::{ActionState, Controller, ControllerEvent, ControllerId, Phase, TriggerPolicy};
pub use effect::{Effect, Event, LogLevel};
pub use envelope::{Envelope, OutboundAction};
pub use error::{ChannelParseError, ConfigError, TransportError};
pub use events::{EventBus, EventPattern, EventReceiver, SubscriberId, Subscription};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use merge::merge_payload;
pub use notify::{Notification, NotifyUrgency};
pub use presentation::{Size, TriggerView, Variant};
