// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derived view state for rendering a trigger

use crate::action::{ActionId, ActionLabels, TriggerOptions};
use crate::controller::{ActionState, Phase};
use serde::{Deserialize, Serialize};

/// Visual variant of a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Primary,
    Secondary,
    Danger,
    Ghost,
}

/// Rendered size of a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

/// Everything a renderer needs to draw one trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerView {
    pub label: String,
    pub disabled: bool,
    pub variant: Variant,
    pub size: Size,
    /// Present only while loading with progress display enabled
    pub progress: Option<u8>,
    pub pending_confirmation: bool,
}

impl TriggerView {
    /// Derive the view for the current controller state
    pub fn derive(labels: &ActionLabels, options: &TriggerOptions, state: &ActionState) -> Self {
        let progress = if state.phase == Phase::Loading && options.show_progress {
            Some(state.progress)
        } else {
            None
        };
        Self {
            label: view_label(labels, options, state),
            disabled: options.disabled || state.phase == Phase::Loading,
            variant: options.variant,
            size: options.size,
            progress,
            pending_confirmation: state.pending_confirmation,
        }
    }

    /// Placeholder view for a trigger whose action id is not registered
    pub fn unknown_action(id: &ActionId) -> Self {
        Self {
            label: format!("Unknown action: {id}"),
            disabled: true,
            variant: Variant::default(),
            size: Size::default(),
            progress: None,
            pending_confirmation: false,
        }
    }
}

fn view_label(labels: &ActionLabels, options: &TriggerOptions, state: &ActionState) -> String {
    if state.pending_confirmation {
        return "Press again to confirm".to_string();
    }
    match state.phase {
        Phase::Idle => labels.label.clone(),
        Phase::Loading => {
            let base = options
                .loading_text
                .clone()
                .unwrap_or_else(|| labels.loading.clone());
            if options.show_progress {
                format!("{} {}%", base, state.progress)
            } else {
                base
            }
        }
        Phase::Success => options
            .success_text
            .clone()
            .unwrap_or_else(|| labels.success.clone()),
        Phase::Error => {
            let base = options
                .error_text
                .clone()
                .unwrap_or_else(|| labels.error.clone());
            if options.auto_retry && state.retry_count > 0 {
                format!(
                    "{} (retry {}/{})",
                    base, state.retry_count, options.max_retries
                )
            } else {
                base
            }
        }
    }
}

#[cfg(test)]
#[path = "presentation_tests.rs"]
mod tests;
