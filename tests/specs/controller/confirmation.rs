//! Confirmation gate specs
//!
//! Verify confirmed triggers arm on the first press, dispatch on the
//! second, and disarm when the window expires.

use crate::prelude::*;

#[tokio::test]
async fn first_press_arms_instead_of_dispatching() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_confirmation())
        .await;
    let mut events = h.observe("arm", &["confirmation:*"]);

    h.press(&id).await;

    let state = h.runtime.state(&id).unwrap();
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.pending_confirmation);
    assert_eq!(h.http.call_count(), 0);
    assert_eq!(h.runtime.view(&id).unwrap().label, "Press again to confirm");
    assert_eq!(names(&mut events), vec!["confirmation:pending"]);
}

#[tokio::test]
async fn second_press_inside_the_window_dispatches() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_confirmation())
        .await;

    h.press(&id).await;
    h.advance(Duration::from_secs(4)).await;
    h.press(&id).await;

    let state = h.runtime.state(&id).unwrap();
    assert_eq!(state.phase, Phase::Success);
    assert!(!state.pending_confirmation);
    assert_eq!(h.http.call_count(), 1);
}

#[tokio::test]
async fn expiry_disarms_without_dispatching() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_confirmation())
        .await;
    let mut events = h.observe("expiry", &["confirmation:expired"]);

    h.press(&id).await;
    h.advance(CONFIRMATION_WINDOW).await;

    let state = h.runtime.state(&id).unwrap();
    assert!(!state.pending_confirmation);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(h.http.call_count(), 0);
    assert_eq!(names(&mut events), vec!["confirmation:expired"]);
    // The idle label comes back once the arming lapses
    assert_eq!(h.runtime.view(&id).unwrap().label, "Submit");
}

#[tokio::test]
async fn press_after_expiry_arms_again() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_confirmation())
        .await;

    h.press(&id).await;
    h.advance(CONFIRMATION_WINDOW).await;
    h.press(&id).await;

    let state = h.runtime.state(&id).unwrap();
    assert!(state.pending_confirmation);
    assert_eq!(h.http.call_count(), 0);
}
