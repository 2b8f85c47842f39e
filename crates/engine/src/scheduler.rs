// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer scheduling for the runtime loop
//!
//! Timers are named and polled: the loop asks for the next deadline,
//! sleeps until then, and collects whatever fired. Setting a timer that
//! already exists restarts it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Named one-shot timers, polled by the runtime loop
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: HashMap<String, Instant>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or restart) a timer
    pub fn set_timer(&mut self, id: String, duration: Duration, now: Instant) {
        self.timers.insert(id, now + duration);
    }

    /// Cancel a timer if it is still pending
    pub fn cancel_timer(&mut self, id: &str) {
        self.timers.remove(id);
    }

    /// Cancel every timer whose id starts with the prefix
    pub fn cancel_prefix(&mut self, prefix: &str) {
        self.timers.retain(|id, _| !id.starts_with(prefix));
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Earliest pending deadline, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().min().copied()
    }

    /// Remove and return the ids of timers due at `now`, earliest first
    pub fn fired_timers(&mut self, now: Instant) -> Vec<String> {
        let mut fired: Vec<(String, Instant)> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (id.clone(), *deadline))
            .collect();
        fired.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let ids: Vec<String> = fired.into_iter().map(|(id, _)| id).collect();
        for id in &ids {
            self.timers.remove(id);
        }
        ids
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
