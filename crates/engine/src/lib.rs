// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Trigger dispatch engine
//!
//! Hosts the controllers, interprets the effects their state machines
//! request, and drives the shared channel connection. One runtime
//! message is processed at a time; dispatches run as spawned tasks and
//! report back through the runtime channel.

mod connection;
mod error;
mod executor;
mod runtime;
mod scheduler;

pub use connection::ConnectionSupervisor;
pub use error::RuntimeError;
pub use executor::{ExecuteError, Executor};
pub use runtime::{Runtime, RuntimeDeps, RuntimeMsg};
pub use scheduler::Scheduler;
