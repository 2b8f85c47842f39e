// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notifications via the platform notifier command

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;
use relay_core::notify::{Notification, NotifyUrgency};
use tokio::process::Command;

/// Desktop notifier that shells out to `osascript` or `notify-send`
#[derive(Clone, Debug, Default)]
pub struct CommandNotifier {
    // Only notify-send takes an app name; osascript ignores it
    #[cfg_attr(target_os = "macos", allow(dead_code))]
    app_name: String,
}

impl CommandNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    #[cfg(target_os = "macos")]
    fn command(&self, notification: &Notification) -> Command {
        let mut command = Command::new("osascript");
        command.arg("-e").arg(build_script(notification));
        command
    }

    #[cfg(not(target_os = "macos"))]
    fn command(&self, notification: &Notification) -> Command {
        let urgency = match notification.urgency {
            NotifyUrgency::Normal => "low",
            NotifyUrgency::Important => "normal",
            NotifyUrgency::Critical => "critical",
        };

        let body = match &notification.subtitle {
            Some(subtitle) => format!("{}\n{}", subtitle, notification.message),
            None => notification.message.clone(),
        };

        let mut command = Command::new("notify-send");
        command
            .arg("--app-name")
            .arg(&self.app_name)
            .arg("--urgency")
            .arg(urgency)
            .arg(&notification.title)
            .arg(body);
        command
    }
}

#[async_trait]
impl NotifyAdapter for CommandNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        let output = self
            .command(&notification)
            .output()
            .await
            .map_err(|e| NotifyError::Failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotifyError::Command(stderr.to_string()));
        }

        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn build_script(notification: &Notification) -> String {
    let mut script = format!(
        r#"display notification "{}" with title "{}""#,
        escape_applescript(&notification.message),
        escape_applescript(&notification.title),
    );

    if let Some(subtitle) = &notification.subtitle {
        script.push_str(&format!(r#" subtitle "{}""#, escape_applescript(subtitle)));
    }

    // Add sound for important/critical notifications
    match notification.urgency {
        NotifyUrgency::Normal => {}
        NotifyUrgency::Important => {
            script.push_str(r#" sound name "default""#);
        }
        NotifyUrgency::Critical => {
            script.push_str(r#" sound name "Sosumi""#);
        }
    }

    script
}

/// Escape special characters for AppleScript strings
#[cfg(target_os = "macos")]
fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
