//! Form submission walkthrough
//!
//! A REST-backed trigger with auto retry: every attempt fails, the
//! budget runs out, the error is surfaced exactly once, and the trigger
//! recovers to Idle.

use crate::prelude::*;

fn overloaded() -> HttpError {
    HttpError::Status {
        status: 503,
        body: "overloaded".to_string(),
    }
}

#[tokio::test]
async fn submit_form_spends_its_retry_budget_and_fails() {
    let mut h = Harness::new();
    for _ in 0..4 {
        h.http.enqueue_err(overloaded());
    }
    // The queue then serves successes the budget never reaches
    let id = h
        .mount(TriggerOptions::new("submitForm").with_auto_retry(3))
        .await;
    let mut events = h.observe(
        "walkthrough",
        &["dispatch:*", "retry:*", "action:*", "controller:reset"],
    );

    h.press(&id).await;
    h.advance(Duration::from_secs(1)).await;
    h.advance(Duration::from_secs(2)).await;
    h.advance(Duration::from_secs(3)).await;
    assert_eq!(h.http.call_count(), 4);
    assert_eq!(h.phase(&id), Phase::Error);

    h.advance(ERROR_RESET).await;
    assert_eq!(h.phase(&id), Phase::Idle);
    assert_eq!(h.http.call_count(), 4);

    assert_eq!(
        names(&mut events),
        vec![
            "dispatch:started",
            "retry:scheduled",
            "dispatch:started",
            "retry:scheduled",
            "dispatch:started",
            "retry:scheduled",
            "dispatch:started",
            "action:failed",
            "controller:reset",
        ]
    );

    let notifications = h.notify.calls();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Action Failed");
    assert_eq!(
        notifications[0].message,
        "submitForm: server returned 503: overloaded"
    );
}

#[tokio::test]
async fn retry_attempts_carry_increasing_delays() {
    let mut h = Harness::new();
    for _ in 0..4 {
        h.http.enqueue_err(overloaded());
    }
    let id = h
        .mount(TriggerOptions::new("submitForm").with_auto_retry(3))
        .await;
    let mut events = h.observe("delays", &["retry:scheduled"]);

    h.press(&id).await;
    h.advance(Duration::from_secs(1)).await;
    h.advance(Duration::from_secs(2)).await;
    h.advance(Duration::from_secs(3)).await;

    let schedule: Vec<(u32, u64)> = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            Event::RetryScheduled {
                attempt, delay_ms, ..
            } => Some((attempt, delay_ms)),
            _ => None,
        })
        .collect();
    assert_eq!(schedule, vec![(1, 1000), (2, 2000), (3, 3000)]);
}
