//! REST transport specs
//!
//! Verify payload layering, response handling, and how HTTP failures
//! surface on the trigger.

use crate::prelude::*;
use relay_core::ActionRegistry;

fn registry_with_defaults() -> ActionRegistry {
    let mut defaults = Map::new();
    defaults.insert("channel".to_string(), json!("web"));
    defaults.insert("draft".to_string(), json!(true));

    let mut registry = ActionRegistry::new();
    registry
        .insert(ActionDescriptor::new(
            "submitForm",
            ActionLabels::new("Submit"),
            Transport::Rest {
                endpoint: "/api/form/submit".to_string(),
                method: HttpMethod::Put,
                default_payload: defaults,
            },
        ))
        .unwrap();
    registry
}

#[tokio::test]
async fn dispatch_uses_the_descriptor_endpoint_and_method() {
    let mut h = Harness::with_registry(registry_with_defaults());
    let id = h.mount(TriggerOptions::new("submitForm")).await;

    h.press(&id).await;

    let calls = h.http.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].endpoint, "/api/form/submit");
    assert_eq!(calls[0].method, HttpMethod::Put);
}

#[tokio::test]
async fn payload_layers_press_over_options_over_defaults() {
    let mut h = Harness::with_registry(registry_with_defaults());
    let mut options_payload = Map::new();
    options_payload.insert("draft".to_string(), json!(false));
    options_payload.insert("locale".to_string(), json!("en"));
    let id = h
        .mount(TriggerOptions::new("submitForm").with_payload(options_payload))
        .await;

    let mut press = Map::new();
    press.insert("locale".to_string(), json!("de"));
    h.runtime.activate(&id, press).await.unwrap();
    h.settle().await;

    let payload = &h.http.calls()[0].payload;
    assert_eq!(payload["channel"], json!("web"));
    assert_eq!(payload["draft"], json!(false));
    assert_eq!(payload["locale"], json!("de"));
}

#[tokio::test]
async fn response_message_reaches_the_notification() {
    let mut h = Harness::new();
    h.http.enqueue_ok(json!({"message": "Form saved", "id": 7}));
    let id = h.mount(TriggerOptions::new("submitForm")).await;

    h.press(&id).await;

    let notifications = h.notify.calls();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Action Complete");
    assert_eq!(notifications[0].message, "Form saved");
}

#[tokio::test]
async fn response_without_a_message_falls_back_to_the_action_name() {
    let mut h = Harness::new();
    h.http.enqueue_ok(json!({"ok": true}));
    let id = h.mount(TriggerOptions::new("submitForm")).await;

    h.press(&id).await;

    let notifications = h.notify.calls();
    assert_eq!(notifications[0].message, "submitForm finished");
}

#[tokio::test]
async fn http_status_errors_surface_in_last_error() {
    let mut h = Harness::new();
    h.http.enqueue_err(HttpError::Status {
        status: 404,
        body: "not found".to_string(),
    });
    let id = h.mount(TriggerOptions::new("submitForm")).await;

    h.press(&id).await;

    let state = h.runtime.state(&id).unwrap();
    assert_eq!(state.phase, Phase::Error);
    assert_eq!(
        state.last_error.as_deref(),
        Some("server returned 404: not found")
    );
}
