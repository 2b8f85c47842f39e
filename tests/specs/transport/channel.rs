//! Channel transport specs
//!
//! Verify the shared connection lifecycle, dispatch publication, and
//! the derived progress/success/error events.

use crate::prelude::*;
use relay_adapters::ChannelAdapter;

#[tokio::test]
async fn mounting_a_channel_trigger_opens_the_connection() {
    let mut h = Harness::new();
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Closed);

    h.mount(TriggerOptions::new("startLiveStream")).await;

    assert_eq!(h.runtime.channel_status(), ChannelStatus::Open);
    assert!(h.channel.is_connected());
}

#[tokio::test]
async fn rest_triggers_leave_the_channel_alone() {
    let mut h = Harness::new();
    h.mount(TriggerOptions::new("submitForm")).await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Closed);
    assert!(!h.channel.is_connected());
}

#[tokio::test]
async fn dispatch_publishes_a_correlated_envelope() {
    let mut h = Harness::new();
    let id = h.mount(TriggerOptions::new("startLiveStream")).await;

    let mut payload = Map::new();
    payload.insert("quality".to_string(), json!("1080p"));
    h.runtime.activate(&id, payload).await.unwrap();
    h.settle().await;

    let published = h.channel.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].event, "live:start");
    assert_eq!(published[0].data["action"], "startLiveStream");
    assert_eq!(published[0].data["payload"]["quality"], json!("1080p"));
    // Correlation id comes from the runtime's id source
    assert_eq!(published[0].data["id"], json!("trigger-2"));
}

#[tokio::test]
async fn derived_events_drive_the_dispatch_to_completion() {
    let mut h = Harness::new();
    let id = h.mount(TriggerOptions::new("startLiveStream")).await;
    h.press(&id).await;
    assert_eq!(h.phase(&id), Phase::Loading);

    h.channel
        .inject(&Envelope::new("live:start:progress", json!({"progress": 60})));
    h.settle().await;
    assert_eq!(h.runtime.state(&id).unwrap().progress, 60);

    h.channel.inject(&Envelope::new(
        "live:start:success",
        json!({"message": "stream is live"}),
    ));
    h.settle().await;

    assert_eq!(h.phase(&id), Phase::Success);
    let notifications = h.notify.calls();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "stream is live");
}

#[tokio::test]
async fn error_events_fail_the_dispatch() {
    let mut h = Harness::new();
    let id = h.mount(TriggerOptions::new("startLiveStream")).await;
    h.press(&id).await;

    h.channel.inject(&Envelope::new(
        "live:start:error",
        json!({"error": "stream rejected"}),
    ));
    h.settle().await;

    let state = h.runtime.state(&id).unwrap();
    assert_eq!(state.phase, Phase::Error);
    assert_eq!(state.last_error.as_deref(), Some("stream rejected"));
}

#[tokio::test]
async fn lifecycle_subscriptions_end_with_the_dispatch() {
    let mut h = Harness::new();
    let id = h.mount(TriggerOptions::new("startLiveStream")).await;
    h.press(&id).await;
    for event in ["live:start:progress", "live:start:success", "live:start:error"] {
        assert_eq!(h.channel.router().subscriber_count(event), 1);
    }

    h.channel
        .inject(&Envelope::new("live:start:success", json!({})));
    h.settle().await;

    for event in ["live:start:progress", "live:start:success", "live:start:error"] {
        assert_eq!(h.channel.router().subscriber_count(event), 0);
    }
}

#[tokio::test]
async fn dispatch_fails_fast_while_disconnected() {
    let mut h = Harness::new();
    let id = h.mount(TriggerOptions::new("startLiveStream")).await;
    h.channel.drop_connection("server restart");
    h.settle().await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Closed);

    h.press(&id).await;

    let state = h.runtime.state(&id).unwrap();
    assert_eq!(state.phase, Phase::Error);
    assert_eq!(state.last_error.as_deref(), Some("channel is not open"));
}

#[tokio::test]
async fn reconnect_backs_off_exponentially() {
    let mut h = Harness::new();
    h.channel.enqueue_connect_error("dial refused");
    h.channel.enqueue_connect_error("dial refused");
    h.mount(TriggerOptions::new("startLiveStream")).await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Failed);

    // First reconnect comes after 500ms and fails again
    h.advance(Duration::from_millis(499)).await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Failed);
    h.advance(Duration::from_millis(1)).await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Failed);

    // Second waits a full second, then succeeds
    h.advance(Duration::from_millis(999)).await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Failed);
    h.advance(Duration::from_millis(1)).await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Open);
}

#[tokio::test]
async fn connection_recovers_after_a_drop() {
    let mut h = Harness::new();
    let id = h.mount(TriggerOptions::new("startLiveStream")).await;

    h.channel.drop_connection("server restart");
    h.settle().await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Closed);

    h.advance(Duration::from_millis(500)).await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Open);

    // The recovered connection dispatches normally
    h.press(&id).await;
    assert_eq!(h.channel.published().len(), 1);
}

#[tokio::test]
async fn unrelated_events_do_not_disturb_the_dispatch() {
    let mut h = Harness::new();
    let id = h.mount(TriggerOptions::new("startLiveStream")).await;
    h.press(&id).await;

    let delivered = h
        .channel
        .inject(&Envelope::new("other:event", json!({"x": 1})));
    assert_eq!(delivered, 0);
    h.settle().await;
    assert_eq!(h.phase(&id), Phase::Loading);

    h.channel
        .inject(&Envelope::new("live:start:success", json!({})));
    h.settle().await;
    assert_eq!(h.phase(&id), Phase::Success);
}
