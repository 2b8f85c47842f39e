//! Live stream walkthrough
//!
//! A confirmed channel-backed trigger with progress display: the second
//! press publishes the dispatch on the shared connection, progress
//! events move the label, and the success event completes the run.

use crate::prelude::*;

#[tokio::test]
async fn live_stream_runs_on_channel_events_end_to_end() {
    let mut h = Harness::new();
    let id = h
        .mount(
            TriggerOptions::new("startLiveStream")
                .with_progress()
                .with_confirmation(),
        )
        .await;
    assert_eq!(h.runtime.channel_status(), ChannelStatus::Open);
    let mut events = h.observe("walkthrough", &["dispatch:*", "action:*"]);

    // First press arms, second press within the window dispatches
    h.press(&id).await;
    assert_eq!(h.phase(&id), Phase::Idle);
    assert!(h.runtime.state(&id).unwrap().pending_confirmation);
    assert!(h.channel.published().is_empty());

    h.advance(Duration::from_secs(1)).await;
    h.press(&id).await;
    assert_eq!(h.runtime.view(&id).unwrap().label, "Loading... 0%");

    for percent in [25u8, 60, 100] {
        h.channel.inject(&Envelope::new(
            "live:start:progress",
            json!({"progress": percent}),
        ));
        h.settle().await;
        assert_eq!(h.runtime.state(&id).unwrap().progress, percent);
    }
    assert_eq!(h.runtime.view(&id).unwrap().label, "Loading... 100%");

    h.channel.inject(&Envelope::new(
        "live:start:success",
        json!({"message": "stream is live"}),
    ));
    h.settle().await;
    assert_eq!(h.phase(&id), Phase::Success);
    assert_eq!(h.runtime.view(&id).unwrap().label, "Live!");

    h.advance(SUCCESS_RESET).await;
    assert_eq!(h.phase(&id), Phase::Idle);
    assert_eq!(h.runtime.view(&id).unwrap().label, "Go Live");

    assert_eq!(
        names(&mut events),
        vec![
            "dispatch:started",
            "action:progress",
            "action:progress",
            "action:progress",
            "action:succeeded",
        ]
    );
    assert_eq!(h.notify.call_count(), 1);
}

#[tokio::test]
async fn progress_beyond_one_hundred_is_clamped() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("startLiveStream").with_progress())
        .await;
    h.press(&id).await;

    h.channel.inject(&Envelope::new(
        "live:start:progress",
        json!({"progress": 250}),
    ));
    h.settle().await;

    assert_eq!(h.runtime.state(&id).unwrap().progress, 100);
    assert_eq!(h.runtime.view(&id).unwrap().label, "Loading... 100%");
}

#[tokio::test]
async fn two_channel_triggers_share_one_connection() {
    let mut h = Harness::new();
    let a = h.mount(TriggerOptions::new("startLiveStream")).await;

    // The second mount finds the channel already open and leaves it be
    let mut events = h.observe("conn", &["channel:*"]);
    let b = h
        .mount(TriggerOptions::new("startLiveStream").with_socket_event("live:clip"))
        .await;
    assert!(drain(&mut events).is_empty());

    h.press(&a).await;
    h.press(&b).await;
    let published = h.channel.published();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].event, "live:start");
    assert_eq!(published[1].event, "live:clip");

    // Completion is routed by event name, not broadcast
    h.channel
        .inject(&Envelope::new("live:clip:success", json!({})));
    h.settle().await;
    assert_eq!(h.phase(&b), Phase::Success);
    assert_eq!(h.phase(&a), Phase::Loading);
}
