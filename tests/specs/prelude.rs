//! Shared fixture for behavioral specs.
//!
//! Builds a runtime wired to fake transports with a manual clock, and
//! provides helpers to drive spawned dispatches and due timers
//! deterministically. Specs only go through the public API.

use relay_core::ActionRegistry;

pub use std::time::Duration;

pub use relay_adapters::{FakeChannelAdapter, FakeHttpAdapter, FakeNotifyAdapter, HttpError};
pub use relay_core::controller::{CONFIRMATION_WINDOW, ERROR_RESET, SUCCESS_RESET};
pub use relay_core::{
    ActionDescriptor, ActionLabels, ChannelStatus, ControllerId, Envelope, Event, EventPattern,
    EventReceiver, FakeClock, HttpMethod, NotifyConfig, Phase, SequentialIdGen, Subscription,
    Transport, TriggerOptions,
};
pub use relay_engine::{Runtime, RuntimeDeps};
pub use serde_json::{json, Map, Value};

pub type SpecRuntime =
    Runtime<FakeHttpAdapter, FakeChannelAdapter, FakeNotifyAdapter, FakeClock, SequentialIdGen>;

/// The actions every spec can mount by name
pub fn spec_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry
        .insert(ActionDescriptor::new(
            "submitForm",
            ActionLabels::new("Submit").with_loading("Saving..."),
            Transport::Rest {
                endpoint: "/api/form/submit".to_string(),
                method: HttpMethod::Post,
                default_payload: Map::new(),
            },
        ))
        .unwrap();
    registry
        .insert(ActionDescriptor::new(
            "startLiveStream",
            ActionLabels::new("Go Live").with_success("Live!"),
            Transport::Channel {
                event_name: "live:start".to_string(),
            },
        ))
        .unwrap();
    registry
}

pub struct Harness {
    pub runtime: SpecRuntime,
    pub http: FakeHttpAdapter,
    pub channel: FakeChannelAdapter,
    pub notify: FakeNotifyAdapter,
    pub clock: FakeClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_registry(spec_registry())
    }

    pub fn with_registry(registry: ActionRegistry) -> Self {
        let http = FakeHttpAdapter::new();
        let channel = FakeChannelAdapter::new();
        let notify = FakeNotifyAdapter::new();
        let clock = FakeClock::new();
        let runtime = Runtime::new(
            RuntimeDeps {
                http: http.clone(),
                channel: channel.clone(),
                notify: notify.clone(),
            },
            registry,
            NotifyConfig::default_config(),
            clock.clone(),
            SequentialIdGen::new("trigger"),
        );
        Self {
            runtime,
            http,
            channel,
            notify,
            clock,
        }
    }

    /// Let spawned dispatch tasks run, then handle what they sent back.
    pub async fn settle(&mut self) {
        for _ in 0..8 {
            tokio::task::yield_now().await;
            self.runtime.pump().await.unwrap();
        }
    }

    /// Advance the clock, fire whatever came due, then settle.
    pub async fn advance(&mut self, duration: Duration) {
        self.clock.advance(duration);
        self.runtime.fire_due_timers().await;
        self.settle().await;
    }

    /// Mount a trigger and settle so channel-backed ones come up connected.
    pub async fn mount(&mut self, options: TriggerOptions) -> ControllerId {
        let id = self.runtime.mount(options).await.unwrap();
        self.settle().await;
        id
    }

    /// Press the trigger with an empty payload and settle.
    pub async fn press(&mut self, id: &ControllerId) {
        self.runtime.activate(id, Map::new()).await.unwrap();
        self.settle().await;
    }

    pub fn phase(&self, id: &ControllerId) -> Phase {
        self.runtime.state(id).unwrap().phase
    }

    /// Subscribe to the event stream under the given patterns.
    pub fn observe(&self, id: &str, patterns: &[&str]) -> EventReceiver {
        let patterns = patterns.iter().map(|p| EventPattern::new(*p)).collect();
        self.runtime
            .subscribe_events(Subscription::new(id, patterns, "spec observer"))
    }
}

/// Pull every event delivered so far.
pub fn drain(events: &mut EventReceiver) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Event names in delivery order, for sequence assertions.
pub fn names(events: &mut EventReceiver) -> Vec<String> {
    drain(events).iter().map(Event::name).collect()
}
