//! Transport resolution specs
//!
//! Verify how mount-time options and the registry combine to pick each
//! trigger's transport: inline socket events win under realtime, inline
//! endpoints next, then whatever the registry declares.

use crate::prelude::*;

#[tokio::test]
async fn realtime_socket_event_wins_over_an_endpoint() {
    let mut h = Harness::new();
    let id = h
        .mount(
            TriggerOptions::new("broadcast")
                .with_endpoint("/api/broadcast")
                .with_socket_event("broadcast:send"),
        )
        .await;

    h.press(&id).await;

    assert_eq!(h.http.call_count(), 0);
    let published = h.channel.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].event, "broadcast:send");
}

#[tokio::test]
async fn socket_event_without_realtime_falls_back_to_rest() {
    let mut h = Harness::new();
    let mut options = TriggerOptions::new("broadcast")
        .with_endpoint("/api/broadcast")
        .with_socket_event("broadcast:send");
    options.realtime = false;
    let id = h.mount(options).await;

    h.press(&id).await;

    assert_eq!(h.channel.published().len(), 0);
    let calls = h.http.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].endpoint, "/api/broadcast");
}

#[tokio::test]
async fn inline_endpoint_overrides_the_registry_transport() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_endpoint("/api/v2/form"))
        .await;

    h.press(&id).await;

    let calls = h.http.calls();
    assert_eq!(calls[0].endpoint, "/api/v2/form");
}

#[tokio::test]
async fn registry_supplies_the_transport_when_options_are_silent() {
    let mut h = Harness::new();
    let rest = h.mount(TriggerOptions::new("submitForm")).await;
    let channel = h.mount(TriggerOptions::new("startLiveStream")).await;

    h.press(&rest).await;
    h.press(&channel).await;

    assert_eq!(h.http.calls()[0].endpoint, "/api/form/submit");
    assert_eq!(h.channel.published()[0].event, "live:start");
}

#[tokio::test]
async fn unknown_action_without_overrides_fails_to_mount() {
    let mut h = Harness::new();
    let result = h.runtime.mount(TriggerOptions::new("noSuchAction")).await;
    assert!(result.is_err());
    let error = result.err().map(|e| e.to_string()).unwrap_or_default();
    assert!(error.contains("noSuchAction"), "unexpected error: {error}");
}

#[tokio::test]
async fn registry_labels_reach_the_view() {
    let mut h = Harness::new();
    let id = h.mount(TriggerOptions::new("startLiveStream")).await;
    assert_eq!(h.runtime.view(&id).unwrap().label, "Go Live");

    h.press(&id).await;
    assert_eq!(h.runtime.view(&id).unwrap().label, "Loading...");

    h.channel
        .inject(&Envelope::new("live:start:success", json!({})));
    h.settle().await;
    assert_eq!(h.runtime.view(&id).unwrap().label, "Live!");
}

#[tokio::test]
async fn option_label_overrides_beat_the_registry() {
    let mut h = Harness::new();
    let id = h
        .mount(
            TriggerOptions::new("submitForm")
                .with_loading_text("Submitting...")
                .with_success_text("Sent"),
        )
        .await;

    h.press(&id).await;
    assert_eq!(h.runtime.view(&id).unwrap().label, "Sent");
}
