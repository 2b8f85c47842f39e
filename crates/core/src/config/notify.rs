// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification configuration
//!
//! Maps events to notifications based on pattern matching rules.

use crate::effect::Event;
use crate::events::EventPattern;
use crate::notify::{Notification, NotifyUrgency};

/// Configuration for which events trigger notifications
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    rules: Vec<NotifyRule>,
}

/// A rule mapping an event pattern to a notification
#[derive(Debug, Clone)]
pub struct NotifyRule {
    pub pattern: EventPattern,
    pub urgency: NotifyUrgency,
    /// If true, show notification. If false, suppress.
    pub enabled: bool,
}

impl NotifyConfig {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Default rules: one notification per terminal outcome, plus
    /// channel connection loss
    pub fn default_config() -> Self {
        let mut config = Self::new();

        config.add_rule("action:succeeded", NotifyUrgency::Normal, true);
        config.add_rule("action:failed", NotifyUrgency::Important, true);
        config.add_rule("channel:failed", NotifyUrgency::Critical, true);

        config
    }

    /// Add a notification rule
    pub fn add_rule(&mut self, pattern: &str, urgency: NotifyUrgency, enabled: bool) {
        self.rules.push(NotifyRule {
            pattern: EventPattern::new(pattern),
            urgency,
            enabled,
        });
    }

    /// Check if an event should trigger a notification.
    /// The first matching rule wins.
    pub fn should_notify(&self, event: &Event) -> Option<NotifyUrgency> {
        let event_name = event.name();

        for rule in &self.rules {
            if rule.pattern.matches(&event_name) {
                if rule.enabled {
                    return Some(rule.urgency);
                } else {
                    return None;
                }
            }
        }

        None
    }

    /// Convert an event to a notification if configured
    pub fn to_notification(&self, event: &Event) -> Option<Notification> {
        let urgency = self.should_notify(event)?;
        Some(event_to_notification(event, urgency))
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn event_to_notification(event: &Event, urgency: NotifyUrgency) -> Notification {
    match event {
        Event::ActionSucceeded {
            action, message, ..
        } => {
            let body = message
                .clone()
                .unwrap_or_else(|| format!("{} finished", action));
            Notification::new("Action Complete", body).with_urgency(urgency)
        }
        Event::ActionFailed { action, error, .. } => {
            Notification::new("Action Failed", format!("{}: {}", action, error))
                .with_urgency(urgency)
        }
        Event::ChannelFailed { error } => {
            Notification::new("Channel Failed", error.clone()).with_urgency(urgency)
        }
        // Default: use event name as title
        other => Notification::new(
            other.name().replace(':', " ").to_uppercase(),
            format!("{:?}", other),
        )
        .with_urgency(urgency),
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
