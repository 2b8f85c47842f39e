// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event routing for observers
//!
//! - `EventBus` routes events to subscribers using name patterns
//! - `EventPattern` matches event names segment by segment

mod bus;
mod subscription;

pub use bus::{EventBus, EventReceiver, EventSender};
pub use subscription::{EventPattern, SubscriberId, Subscription};
