//! Retry policy specs
//!
//! Verify the linear backoff schedule, the retry budget, and that a
//! mid-retry success clears the count.

use crate::prelude::*;

fn refused() -> HttpError {
    HttpError::Request("connection refused".to_string())
}

#[tokio::test]
async fn failures_are_terminal_without_auto_retry() {
    let mut h = Harness::new();
    h.http.enqueue_err(refused());
    let id = h.mount(TriggerOptions::new("submitForm")).await;

    h.press(&id).await;
    assert_eq!(h.phase(&id), Phase::Error);

    // No retry is ever scheduled
    h.advance(Duration::from_secs(1)).await;
    assert_eq!(h.http.call_count(), 1);
    assert_eq!(h.phase(&id), Phase::Error);
}

#[tokio::test]
async fn backoff_grows_linearly_with_the_attempt() {
    let mut h = Harness::new();
    for _ in 0..3 {
        h.http.enqueue_err(refused());
    }
    let id = h
        .mount(TriggerOptions::new("submitForm").with_auto_retry(2))
        .await;

    h.press(&id).await;
    assert_eq!(h.phase(&id), Phase::Error);
    assert_eq!(h.http.call_count(), 1);

    // First retry waits a full second
    h.advance(Duration::from_millis(999)).await;
    assert_eq!(h.http.call_count(), 1);
    h.advance(Duration::from_millis(1)).await;
    assert_eq!(h.http.call_count(), 2);

    // Second retry waits two
    h.advance(Duration::from_millis(1999)).await;
    assert_eq!(h.http.call_count(), 2);
    h.advance(Duration::from_millis(1)).await;
    assert_eq!(h.http.call_count(), 3);

    // Budget of 2 spent: terminal
    assert_eq!(h.phase(&id), Phase::Error);
    assert_eq!(h.runtime.state(&id).unwrap().retry_count, 2);
}

#[tokio::test]
async fn retry_count_shows_in_the_error_label() {
    let mut h = Harness::new();
    h.http.enqueue_err(refused());
    h.http.enqueue_err(refused());
    let id = h
        .mount(TriggerOptions::new("submitForm").with_auto_retry(3))
        .await;

    h.press(&id).await;
    assert_eq!(h.runtime.view(&id).unwrap().label, "Failed (retry 1/3)");

    h.advance(Duration::from_secs(1)).await;
    assert_eq!(h.runtime.view(&id).unwrap().label, "Failed (retry 2/3)");
}

#[tokio::test]
async fn success_mid_retry_clears_the_count() {
    let mut h = Harness::new();
    h.http.enqueue_err(refused());
    h.http.enqueue_ok(json!({"message": "Form saved"}));
    let id = h
        .mount(TriggerOptions::new("submitForm").with_auto_retry(3))
        .await;

    h.press(&id).await;
    assert_eq!(h.runtime.state(&id).unwrap().retry_count, 1);

    h.advance(Duration::from_secs(1)).await;
    let state = h.runtime.state(&id).unwrap();
    assert_eq!(state.phase, Phase::Success);
    assert_eq!(state.retry_count, 0);
    assert!(state.last_error.is_none());
}

#[tokio::test]
async fn retry_reuses_the_original_payload() {
    let mut h = Harness::new();
    h.http.enqueue_err(refused());
    let id = h
        .mount(TriggerOptions::new("submitForm").with_auto_retry(1))
        .await;

    let mut payload = Map::new();
    payload.insert("draft".to_string(), json!(true));
    h.runtime.activate(&id, payload).await.unwrap();
    h.settle().await;

    h.advance(Duration::from_secs(1)).await;
    let calls = h.http.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].payload, calls[1].payload);
    assert_eq!(calls[1].payload["draft"], json!(true));
}
