//! Terminal reset specs
//!
//! Success and Error are display phases: they hold long enough to be
//! seen, then drain back to Idle on their own.

use crate::prelude::*;

#[tokio::test]
async fn success_drains_to_idle_after_two_seconds() {
    let mut h = Harness::new();
    let id = h.mount(TriggerOptions::new("submitForm")).await;
    let mut events = h.observe("reset", &["controller:reset"]);

    h.press(&id).await;
    assert_eq!(h.phase(&id), Phase::Success);
    assert_eq!(h.runtime.view(&id).unwrap().label, "Success!");

    h.advance(Duration::from_millis(1999)).await;
    assert_eq!(h.phase(&id), Phase::Success);

    h.advance(Duration::from_millis(1)).await;
    let state = h.runtime.state(&id).unwrap();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.progress, 0);
    assert_eq!(h.runtime.view(&id).unwrap().label, "Submit");
    assert_eq!(names(&mut events), vec!["controller:reset"]);
}

#[tokio::test]
async fn error_holds_a_second_longer_than_success() {
    let mut h = Harness::new();
    h.http
        .enqueue_err(HttpError::Status {
            status: 500,
            body: "boom".to_string(),
        });
    let id = h.mount(TriggerOptions::new("submitForm")).await;

    h.press(&id).await;
    assert_eq!(h.phase(&id), Phase::Error);

    // Still showing at the point Success would have drained
    h.advance(SUCCESS_RESET).await;
    assert_eq!(h.phase(&id), Phase::Error);

    h.advance(ERROR_RESET - SUCCESS_RESET).await;
    assert_eq!(h.phase(&id), Phase::Idle);
}

#[tokio::test]
async fn press_during_the_display_phase_is_rejected() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_debounce(Duration::ZERO))
        .await;
    let mut events = h.observe("cooldown", &["activation:rejected"]);

    h.press(&id).await;
    assert_eq!(h.phase(&id), Phase::Success);

    h.press(&id).await;
    assert_eq!(h.http.call_count(), 1);
    let rejected = drain(&mut events);
    assert_eq!(
        rejected,
        vec![Event::ActivationRejected {
            controller: id.0.clone(),
            reason: "cooling down".to_string()
        }]
    );
}

#[tokio::test]
async fn trigger_is_usable_again_after_the_reset() {
    let mut h = Harness::new();
    let id = h
        .mount(TriggerOptions::new("submitForm").with_debounce(Duration::ZERO))
        .await;

    h.press(&id).await;
    h.advance(SUCCESS_RESET).await;
    h.press(&id).await;

    assert_eq!(h.http.call_count(), 2);
    assert_eq!(h.phase(&id), Phase::Success);
}
