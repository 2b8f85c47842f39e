// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use crate::Scheduler;
use relay_adapters::{NotifyAdapter, NotifyError};
use relay_core::{Clock, Effect, EventBus, LogLevel, NotifyConfig};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::Instrument;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
    #[error("dispatch effect reached the executor for {0}; dispatches are routed by the runtime")]
    UnroutedDispatch(String),
}

/// Executes effects requested by the controller and channel state machines.
///
/// Dispatch effects are the exception: they need the transport adapters and
/// the action registry, so the runtime intercepts them before this point.
pub struct Executor<N, K> {
    bus: EventBus,
    notify: N,
    notify_config: NotifyConfig,
    scheduler: Arc<Mutex<Scheduler>>,
    clock: K,
}

impl<N, K> Executor<N, K>
where
    N: NotifyAdapter,
    K: Clock,
{
    /// Create a new executor
    pub fn new(
        bus: EventBus,
        notify: N,
        notify_config: NotifyConfig,
        scheduler: Arc<Mutex<Scheduler>>,
        clock: K,
    ) -> Self {
        Self {
            bus,
            notify,
            notify_config,
            scheduler,
            clock,
        }
    }

    /// Execute a single effect with tracing
    pub async fn execute(&self, effect: Effect) -> Result<(), ExecuteError> {
        let span = tracing::info_span!("effect", effect = effect.name());
        async move {
            tracing::info!(fields = ?effect.fields(), "executing");

            let start = std::time::Instant::now();
            let result = self.execute_inner(effect).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "completed"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    /// Inner execution logic for a single effect
    async fn execute_inner(&self, effect: Effect) -> Result<(), ExecuteError> {
        match effect {
            Effect::Emit(event) => {
                // Observers see the event even when the notifier errors out,
                // so publish before notifying.
                let notification = self.notify_config.to_notification(&event);
                self.bus.publish(event);
                if let Some(notification) = notification {
                    self.notify.notify(notification).await?;
                }
                Ok(())
            }

            Effect::Dispatch { controller, .. } => {
                Err(ExecuteError::UnroutedDispatch(controller.to_string()))
            }

            Effect::SetTimer { id, duration } => {
                let now = self.clock.now();
                self.scheduler
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .set_timer(id, duration, now);
                Ok(())
            }

            Effect::CancelTimer { id } => {
                self.scheduler
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .cancel_timer(&id);
                Ok(())
            }

            Effect::Log { level, message } => {
                match level {
                    LogLevel::Debug => tracing::debug!("{}", message),
                    LogLevel::Info => tracing::info!("{}", message),
                    LogLevel::Warn => tracing::warn!("{}", message),
                    LogLevel::Error => tracing::error!("{}", message),
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
