// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event pattern matching and subscriptions

/// Pattern for matching event names
/// Supports:
///   - Exact: "action:succeeded"
///   - Single wildcard: "action:*" matches "action:succeeded", "action:failed"
///   - Category: "channel:**" matches all channel events
#[derive(Clone, Debug)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether an event name matches this pattern
    pub fn matches(&self, event_name: &str) -> bool {
        let pattern: Vec<&str> = self.0.split(':').collect();
        let name: Vec<&str> = event_name.split(':').collect();
        match_segments(&pattern, &name)
    }
}

fn match_segments(pattern: &[&str], name: &[&str]) -> bool {
    match (pattern.first(), name.first()) {
        (None, None) => true,
        (Some(&"**"), _) => true,
        (None, Some(_)) | (Some(_), None) => false,
        (Some(&"*"), Some(_)) => match_segments(&pattern[1..], &name[1..]),
        (Some(p), Some(n)) => p == n && match_segments(&pattern[1..], &name[1..]),
    }
}

/// Identifies one subscriber on the bus
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

/// A subscriber's set of patterns
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub patterns: Vec<EventPattern>,
    pub description: String,
}

impl Subscription {
    pub fn new(
        id: impl Into<String>,
        patterns: Vec<EventPattern>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: SubscriberId(id.into()),
            patterns,
            description: description.into(),
        }
    }

    /// True when any pattern matches the event name
    pub fn matches(&self, event_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(event_name))
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
