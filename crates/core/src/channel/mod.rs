// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared channel connection state and inbound message routing

mod router;
mod state;

pub use router::ChannelRouter;
pub use state::{
    reconnect_delay, ChannelConnection, ChannelEvent, ChannelStatus, RECONNECT_BASE, RECONNECT_CAP,
    RECONNECT_TIMER,
};
