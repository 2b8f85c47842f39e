//! Debounce gate specs
//!
//! Verify presses inside the debounce window are dropped silently and
//! that the window is measured from the last invocation, spanning any
//! terminal reset in between.

use crate::prelude::*;

#[tokio::test]
async fn press_inside_the_window_is_dropped_silently() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_debounce(Duration::from_secs(10)))
        .await;
    let mut events = h.observe("drops", &["activation:rejected"]);

    h.press(&id).await;
    assert_eq!(h.phase(&id), Phase::Success);
    h.advance(SUCCESS_RESET).await;
    assert_eq!(h.phase(&id), Phase::Idle);

    // Only 2s of the 10s window have elapsed
    h.press(&id).await;
    assert_eq!(h.phase(&id), Phase::Idle);
    assert_eq!(h.http.call_count(), 1);
    // Dropped, not rejected: debounced presses emit nothing
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn window_is_measured_from_the_invocation() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_debounce(Duration::from_secs(3)))
        .await;

    h.press(&id).await;
    h.advance(SUCCESS_RESET).await;

    // 2s since the invocation: still inside the 3s window
    h.press(&id).await;
    assert_eq!(h.http.call_count(), 1);

    // 3s since the invocation: the window has closed
    h.advance(Duration::from_secs(1)).await;
    h.press(&id).await;
    assert_eq!(h.http.call_count(), 2);
    assert_eq!(h.phase(&id), Phase::Success);
}

#[tokio::test]
async fn first_press_is_never_debounced() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_debounce(Duration::from_secs(60)))
        .await;

    h.press(&id).await;
    assert_eq!(h.http.call_count(), 1);
}
