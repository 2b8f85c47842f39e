// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification data types

/// Notification urgency level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyUrgency {
    /// Normal notification (no sound)
    Normal,
    /// Important notification (default sound)
    Important,
    /// Critical notification (alert sound, stays visible)
    Critical,
}

/// A notification to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub subtitle: Option<String>,
    pub message: String,
    pub urgency: NotifyUrgency,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            message: message.into(),
            urgency: NotifyUrgency::Normal,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_urgency(mut self, urgency: NotifyUrgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn important(mut self) -> Self {
        self.urgency = NotifyUrgency::Important;
        self
    }

    pub fn critical(mut self) -> Self {
        self.urgency = NotifyUrgency::Critical;
        self
    }
}
