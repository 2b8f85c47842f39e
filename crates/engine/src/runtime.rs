// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the trigger dispatch engine
//!
//! The runtime hosts every mounted controller, feeds runtime messages
//! through the pure state machines one at a time, and interprets the
//! returned effects. Dispatches run as spawned tasks and report back
//! through the message queue, so controllers stay single-flight while
//! different controllers overlap freely.

use crate::connection::ConnectionSupervisor;
use crate::{error::RuntimeError, Executor, Scheduler};
use relay_adapters::{ChannelAdapter, HttpAdapter, NotifyAdapter, RestRequest};
use relay_core::channel::{ChannelEvent, ChannelStatus, RECONNECT_TIMER};
use relay_core::envelope::{error_event, progress_event, success_event};
use relay_core::{
    merge_payload, resolve_transport, ActionId, ActionLabels, ActionRegistry, ActionState, Clock,
    ConfigError, Controller, ControllerEvent, ControllerId, Effect, Envelope, Event, EventBus,
    EventReceiver, IdGen, LogLevel, NotifyConfig, OutboundAction, SubscriberId, Subscription,
    Transport, TransportKind, TriggerOptions, TriggerPolicy, TriggerView,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Runtime adapter dependencies
pub struct RuntimeDeps<H, C, N> {
    pub http: H,
    pub channel: C,
    pub notify: N,
}

/// Messages consumed by the runtime loop, one at a time
#[derive(Debug, PartialEq)]
pub enum RuntimeMsg {
    /// A trigger press
    Activate {
        controller: ControllerId,
        payload: Map<String, Value>,
    },
    /// One dispatch attempt finished
    DispatchOutcome {
        controller: ControllerId,
        result: Result<Option<String>, String>,
    },
    /// A controller event raised outside the loop, e.g. channel progress
    Lifecycle {
        controller: ControllerId,
        event: ControllerEvent,
    },
    /// A scheduler timer fired
    Timer { id: String },
    /// The shared channel connection changed
    Channel(ChannelEvent),
    /// Stop the loop
    Shutdown,
}

/// One mounted trigger with its configuration
struct Mounted {
    controller: Controller,
    options: TriggerOptions,
    labels: ActionLabels,
}

/// Runtime that hosts controllers and coordinates the system
pub struct Runtime<H, C, N, K: Clock, I: IdGen> {
    executor: Executor<N, K>,
    http: H,
    channel: C,
    connection: ConnectionSupervisor<C>,
    registry: ActionRegistry,
    mounts: HashMap<ControllerId, Mounted>,
    /// Lifecycle subscriptions of the in-flight channel dispatch
    subscriptions: HashMap<ControllerId, Vec<SubscriberId>>,
    scheduler: Arc<Mutex<Scheduler>>,
    bus: EventBus,
    clock: K,
    id_gen: I,
    tx: mpsc::UnboundedSender<RuntimeMsg>,
    rx: mpsc::UnboundedReceiver<RuntimeMsg>,
}

impl<H, C, N, K, I> Runtime<H, C, N, K, I>
where
    H: HttpAdapter,
    C: ChannelAdapter,
    N: NotifyAdapter,
    K: Clock,
    I: IdGen,
{
    /// Create a new runtime
    pub fn new(
        deps: RuntimeDeps<H, C, N>,
        registry: ActionRegistry,
        notify_config: NotifyConfig,
        clock: K,
        id_gen: I,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Arc::new(Mutex::new(Scheduler::new()));
        let bus = EventBus::new();
        let executor = Executor::new(
            bus.clone(),
            deps.notify,
            notify_config,
            Arc::clone(&scheduler),
            clock.clone(),
        );
        let connection = ConnectionSupervisor::new(deps.channel.clone(), tx.clone());
        Self {
            executor,
            http: deps.http,
            channel: deps.channel,
            connection,
            registry,
            mounts: HashMap::new(),
            subscriptions: HashMap::new(),
            scheduler,
            bus,
            clock,
            id_gen,
            tx,
            rx,
        }
    }

    /// Mount a trigger, validating its configuration up front.
    ///
    /// The first channel-backed mount starts the shared connection.
    pub async fn mount(&mut self, options: TriggerOptions) -> Result<ControllerId, RuntimeError> {
        let descriptor = self.registry.lookup(&options.action_id).cloned();
        if descriptor.is_none() && options.endpoint.is_none() && options.socket_event.is_none() {
            tracing::warn!(action = %options.action_id, "mount references an unknown action");
            return Err(ConfigError::UnknownAction(options.action_id.clone()).into());
        }

        let transport = resolve_transport(&options, descriptor.as_ref())?;
        let labels = descriptor
            .map(|d| d.labels)
            .unwrap_or_else(|| ActionLabels::new(options.action_id.0.clone()));

        let id = ControllerId(self.id_gen.next());
        let controller = Controller::new(
            id.clone(),
            options.action_id.clone(),
            transport.clone(),
            TriggerPolicy::from(&options),
        );
        tracing::info!(
            controller = %id,
            action = %options.action_id,
            transport = transport.kind().as_str(),
            "controller mounted"
        );
        self.mounts.insert(
            id.clone(),
            Mounted {
                controller,
                options,
                labels,
            },
        );

        if transport.kind() == TransportKind::Channel
            && self.connection.status() == ChannelStatus::Closed
        {
            let effects = self.connection.apply(ChannelEvent::Start);
            self.run_effects(effects).await?;
        }

        Ok(id)
    }

    /// Unmount a trigger: cancel its timers, drop its channel
    /// subscriptions, and discard its state.
    pub fn unmount(&mut self, id: &ControllerId) -> Result<(), RuntimeError> {
        let mount = self
            .mounts
            .remove(id)
            .ok_or_else(|| RuntimeError::ControllerNotFound(id.clone()))?;
        self.clear_dispatch_subscriptions(id);
        self.scheduler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .cancel_prefix(&mount.controller.timer_prefix());
        tracing::info!(controller = %id, "controller unmounted");
        Ok(())
    }

    /// Feed one trigger press into its controller
    pub async fn activate(
        &mut self,
        id: &ControllerId,
        payload: Map<String, Value>,
    ) -> Result<(), RuntimeError> {
        let mount = self
            .mounts
            .get(id)
            .ok_or_else(|| RuntimeError::ControllerNotFound(id.clone()))?;
        if mount.options.disabled {
            return self
                .executor
                .execute(Effect::Emit(Event::ActivationRejected {
                    controller: id.0.clone(),
                    reason: "disabled".to_string(),
                }))
                .await
                .map_err(Into::into);
        }
        let payload = merge_payload(&mount.options.payload, &payload);
        self.apply_controller_event(id, ControllerEvent::Activate { payload })
            .await
    }

    /// Process one runtime message
    pub async fn handle_msg(&mut self, msg: RuntimeMsg) -> Result<(), RuntimeError> {
        match msg {
            RuntimeMsg::Activate {
                controller,
                payload,
            } => self.activate(&controller, payload).await,
            RuntimeMsg::DispatchOutcome { controller, result } => {
                self.handle_outcome(&controller, result).await
            }
            RuntimeMsg::Lifecycle { controller, event } => {
                if self.mounts.contains_key(&controller) {
                    self.apply_controller_event(&controller, event).await
                } else {
                    tracing::debug!(controller = %controller, "lifecycle event for unmounted controller");
                    Ok(())
                }
            }
            RuntimeMsg::Timer { id } => self.handle_timer(&id).await,
            RuntimeMsg::Channel(event) => {
                let effects = self.connection.apply(event);
                self.run_effects(effects).await
            }
            RuntimeMsg::Shutdown => Ok(()),
        }
    }

    /// Fire every scheduler timer whose deadline has passed
    pub async fn fire_due_timers(&mut self) {
        let due = {
            let mut scheduler = self.scheduler.lock().unwrap_or_else(|e| e.into_inner());
            scheduler.fired_timers(self.clock.now())
        };
        for id in due {
            if let Err(e) = self.handle_timer(&id).await {
                tracing::error!(timer = %id, error = %e, "timer handling failed");
            }
        }
    }

    /// Handle every message already queued, without blocking
    pub async fn pump(&mut self) -> Result<(), RuntimeError> {
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_msg(msg).await?;
        }
        Ok(())
    }

    /// Run the event loop until shutdown
    pub async fn run(&mut self) -> Result<(), RuntimeError> {
        tracing::info!("runtime started");
        loop {
            let tick = self.next_tick();
            tokio::select! {
                msg = self.rx.recv() => {
                    match msg {
                        None | Some(RuntimeMsg::Shutdown) => break,
                        Some(msg) => {
                            if let Err(e) = self.handle_msg(msg).await {
                                tracing::error!(error = %e, "message handling failed");
                            }
                        }
                    }
                }
                _ = tokio::time::sleep(tick) => {
                    self.fire_due_timers().await;
                }
            }
        }
        self.shutdown().await?;
        tracing::info!("runtime stopped");
        Ok(())
    }

    /// Snapshot of a controller's state
    pub fn state(&self, id: &ControllerId) -> Option<ActionState> {
        self.mounts.get(id).map(|m| m.controller.state.clone())
    }

    /// Render-ready view of a controller
    pub fn view(&self, id: &ControllerId) -> Option<TriggerView> {
        self.mounts
            .get(id)
            .map(|m| TriggerView::derive(&m.labels, &m.options, &m.controller.state))
    }

    /// Status of the shared channel connection
    pub fn channel_status(&self) -> ChannelStatus {
        self.connection.status()
    }

    /// Subscribe to runtime events by pattern
    pub fn subscribe_events(&self, subscription: Subscription) -> EventReceiver {
        self.bus.subscribe(subscription)
    }

    /// Sender for feeding messages into the loop from outside
    pub fn sender(&self) -> mpsc::UnboundedSender<RuntimeMsg> {
        self.tx.clone()
    }

    async fn apply_controller_event(
        &mut self,
        id: &ControllerId,
        event: ControllerEvent,
    ) -> Result<(), RuntimeError> {
        let mount = self
            .mounts
            .get(id)
            .ok_or_else(|| RuntimeError::ControllerNotFound(id.clone()))?;
        let from = mount.controller.state.phase;
        let (next, effects) = mount.controller.transition(event, &self.clock);
        let to = next.state.phase;
        if from != to {
            tracing::debug!(controller = %id, from = from.name(), to = to.name(), "phase changed");
        }
        if let Some(mount) = self.mounts.get_mut(id) {
            mount.controller = next;
        }
        self.run_effects(effects).await
    }

    async fn handle_outcome(
        &mut self,
        id: &ControllerId,
        result: Result<Option<String>, String>,
    ) -> Result<(), RuntimeError> {
        // The dispatch attempt is over either way
        self.clear_dispatch_subscriptions(id);

        if !self.mounts.contains_key(id) {
            return self
                .executor
                .execute(Effect::Log {
                    level: LogLevel::Warn,
                    message: format!("dispatch outcome for unmounted controller {id}"),
                })
                .await
                .map_err(Into::into);
        }

        let event = match result {
            Ok(message) => ControllerEvent::DispatchSucceeded { message },
            Err(error) => ControllerEvent::DispatchFailed { error },
        };
        self.apply_controller_event(id, event).await
    }

    async fn handle_timer(&mut self, id: &str) -> Result<(), RuntimeError> {
        if id == RECONNECT_TIMER {
            let effects = self.connection.apply(ChannelEvent::RetryDue);
            return self.run_effects(effects).await;
        }

        let Some(rest) = id.strip_prefix("controller:") else {
            tracing::debug!(timer = id, "unrecognized timer");
            return Ok(());
        };
        let Some((controller, kind)) = rest.rsplit_once(':') else {
            tracing::debug!(timer = id, "unrecognized timer");
            return Ok(());
        };
        let controller = ControllerId::from(controller);
        if !self.mounts.contains_key(&controller) {
            // Unmounted between firing and handling
            return Ok(());
        }
        let event = match kind {
            "confirm" => ControllerEvent::ConfirmExpired,
            "retry" => ControllerEvent::RetryDue,
            "reset" => ControllerEvent::ResetDue,
            _ => {
                tracing::debug!(timer = id, "unrecognized timer");
                return Ok(());
            }
        };
        self.apply_controller_event(&controller, event).await
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) -> Result<(), RuntimeError> {
        for effect in effects {
            match effect {
                Effect::Dispatch {
                    controller,
                    action,
                    payload,
                } => self.start_dispatch(&controller, &action, payload)?,
                other => self.executor.execute(other).await?,
            }
        }
        Ok(())
    }

    /// Launch one dispatch attempt over the controller's transport.
    /// The outcome comes back through the runtime queue.
    fn start_dispatch(
        &mut self,
        id: &ControllerId,
        action: &ActionId,
        payload: Map<String, Value>,
    ) -> Result<(), RuntimeError> {
        let mount = self
            .mounts
            .get(id)
            .ok_or_else(|| RuntimeError::ControllerNotFound(id.clone()))?;
        match mount.controller.transport.clone() {
            Transport::Rest {
                endpoint,
                method,
                default_payload,
            } => {
                let request =
                    RestRequest::new(endpoint, method, merge_payload(&default_payload, &payload));
                let http = self.http.clone();
                let tx = self.tx.clone();
                let controller = id.clone();
                tokio::spawn(async move {
                    let result = match http.execute(&request).await {
                        Ok(body) => {
                            Ok(body.get("message").and_then(Value::as_str).map(String::from))
                        }
                        Err(e) => Err(e.to_string()),
                    };
                    let _ = tx.send(RuntimeMsg::DispatchOutcome { controller, result });
                });
                Ok(())
            }
            Transport::Channel { event_name } => {
                self.publish_action(id, action, &event_name, payload)
            }
        }
    }

    /// Publish a channel dispatch: subscribe to the derived lifecycle
    /// events first, then send the outbound action envelope.
    fn publish_action(
        &mut self,
        id: &ControllerId,
        action: &ActionId,
        event_name: &str,
        payload: Map<String, Value>,
    ) -> Result<(), RuntimeError> {
        self.clear_dispatch_subscriptions(id);
        let router = self.channel.router().clone();
        let mut subs = Vec::with_capacity(3);

        let progress_tx = self.tx.clone();
        let progress_id = id.clone();
        subs.push(
            router.subscribe(progress_event(event_name), move |envelope: &Envelope| {
                let percent = envelope
                    .data
                    .get("progress")
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
                    .min(100) as u8;
                let _ = progress_tx.send(RuntimeMsg::Lifecycle {
                    controller: progress_id.clone(),
                    event: ControllerEvent::Progress { percent },
                });
            }),
        );

        let success_tx = self.tx.clone();
        let success_id = id.clone();
        subs.push(
            router.subscribe(success_event(event_name), move |envelope: &Envelope| {
                let message = envelope
                    .data
                    .get("message")
                    .and_then(Value::as_str)
                    .map(String::from);
                let _ = success_tx.send(RuntimeMsg::DispatchOutcome {
                    controller: success_id.clone(),
                    result: Ok(message),
                });
            }),
        );

        let error_tx = self.tx.clone();
        let error_id = id.clone();
        subs.push(
            router.subscribe(error_event(event_name), move |envelope: &Envelope| {
                let error = envelope
                    .data
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("action failed")
                    .to_string();
                let _ = error_tx.send(RuntimeMsg::DispatchOutcome {
                    controller: error_id.clone(),
                    result: Err(error),
                });
            }),
        );

        self.subscriptions.insert(id.clone(), subs);

        let envelope = OutboundAction::new(self.id_gen.next(), action.0.clone(), payload)
            .into_envelope(event_name)?;
        let channel = self.channel.clone();
        let tx = self.tx.clone();
        let controller = id.clone();
        tokio::spawn(async move {
            if let Err(e) = channel.publish(&envelope).await {
                let _ = tx.send(RuntimeMsg::DispatchOutcome {
                    controller,
                    result: Err(e.to_string()),
                });
            }
        });
        Ok(())
    }

    fn clear_dispatch_subscriptions(&mut self, id: &ControllerId) {
        if let Some(subs) = self.subscriptions.remove(id) {
            let router = self.channel.router();
            for sub in subs {
                router.unsubscribe(&sub);
            }
        }
    }

    /// Delay until the nearest timer deadline, or an idle heartbeat
    fn next_tick(&self) -> Duration {
        let scheduler = self.scheduler.lock().unwrap_or_else(|e| e.into_inner());
        match scheduler.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(self.clock.now()),
            None => Duration::from_secs(1),
        }
    }

    async fn shutdown(&mut self) -> Result<(), RuntimeError> {
        let effects = self.connection.teardown().await;
        self.subscriptions.clear();
        self.run_effects(effects).await
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
