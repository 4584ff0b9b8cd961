//! Notification Journey
//!
//! The minute-sweep as deployed: overdue delays, reminder windows, quiet
//! hours, per-learner isolation, and the once-per-due-cycle guarantee
//! across repeated sweeps.

use chrono::{Duration, TimeZone, Utc};
use reprise_e2e_tests::fixtures::TestHarness;
use reprise_core::{
    NotificationKind, NotificationSettings, Quality, QuietHours, ReviewFeedback, ScheduleStore,
};

#[test]
fn overdue_delay_then_exactly_one_event_across_sweeps() {
    let harness = TestHarness::new();
    // Default settings carry a 30-minute overdue delay
    harness.seed_schedule("amara", -20);

    let early = harness.engine.run_sweep(harness.now).unwrap();
    assert!(early.events.is_empty());

    // 35 minutes overdue: fires once
    let later = harness.now + Duration::minutes(15);
    let fired = harness.engine.run_sweep(later).unwrap();
    assert_eq!(fired.events.len(), 1);
    assert_eq!(fired.events[0].kind, NotificationKind::Overdue);

    // Minute-cadence sweeps for the next hour stay silent
    for minute in 1..=60 {
        let sweep = harness
            .engine
            .run_sweep(later + Duration::minutes(minute))
            .unwrap();
        assert!(sweep.events.is_empty(), "re-fired at minute {}", minute);
    }
}

#[test]
fn reminder_fires_ahead_of_due_time_once() {
    let harness = TestHarness::new();
    let store = &harness.store;
    harness.seed_schedule("amara", 10);
    store.put_settings(
        "amara",
        NotificationSettings {
            overdue_enabled: false,
            reminder_advance_minutes: 15,
            ..Default::default()
        },
    );

    let report = harness.engine.run_sweep(harness.now).unwrap();
    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events[0].kind, NotificationKind::Reminder);

    let again = harness
        .engine
        .run_sweep(harness.now + Duration::minutes(5))
        .unwrap();
    assert!(again.events.is_empty());
}

#[test]
fn quiet_hours_defer_until_morning() {
    let harness = TestHarness::with_immediate_notifications();
    let night = Utc.with_ymd_and_hms(2026, 5, 2, 23, 30, 0).unwrap();
    harness.store.put_settings(
        "amara",
        NotificationSettings {
            overdue_delay_minutes: 0,
            quiet_hours: QuietHours::parse("22:00", "08:00", true).unwrap(),
            ..Default::default()
        },
    );
    let id = harness.seed_schedule("amara", 0);
    // Rewind the due time so the item is overdue during the night sweep
    let mut schedule = harness.store.get(&id).unwrap();
    schedule.next_review_at = night - Duration::hours(1);
    harness.store.upsert(schedule).unwrap();

    // 23:30 and 07:00 sweeps are inside the window
    assert!(harness.engine.run_sweep(night).unwrap().events.is_empty());
    let dawn = Utc.with_ymd_and_hms(2026, 5, 3, 7, 0, 0).unwrap();
    assert!(harness.engine.run_sweep(dawn).unwrap().events.is_empty());

    // 08:30: deferred candidate fires exactly once
    let morning = Utc.with_ymd_and_hms(2026, 5, 3, 8, 30, 0).unwrap();
    let report = harness.engine.run_sweep(morning).unwrap();
    assert_eq!(report.events.len(), 1);

    let next = harness
        .engine
        .run_sweep(morning + Duration::minutes(1))
        .unwrap();
    assert!(next.events.is_empty());
}

#[test]
fn noisy_settings_never_halt_the_batch() {
    let harness = TestHarness::with_immediate_notifications();
    harness.seed_schedule("noisy", -10);
    harness.seed_schedule("healthy-1", -10);
    harness.seed_schedule("healthy-2", -10);
    harness.store.put_settings(
        "noisy",
        NotificationSettings {
            reminder_advance_minutes: 100_000,
            ..Default::default()
        },
    );

    let report = harness.engine.run_sweep(harness.now).unwrap();
    assert_eq!(report.students_skipped, 1);
    assert_eq!(report.students_processed, 2);
    assert_eq!(report.events.len(), 2);
    assert!(report.events.iter().all(|e| e.student_id.starts_with("healthy")));

    // The noisy learner is retried (and skipped again) next sweep
    let next = harness
        .engine
        .run_sweep(harness.now + Duration::minutes(1))
        .unwrap();
    assert_eq!(next.students_skipped, 1);
}

#[test]
fn feedback_opens_a_fresh_due_cycle() {
    let harness = TestHarness::with_immediate_notifications();
    let id = harness.seed_schedule_with("amara", -5, 1.0, 2.5);

    let first = harness.engine.run_sweep(harness.now).unwrap();
    assert_eq!(first.events.len(), 1);

    // Learner reviews the item; GOOD keeps the one-day interval
    harness
        .engine
        .submit_feedback("amara", &id, &ReviewFeedback::graded(Quality::Good), harness.now)
        .unwrap();

    // Silent until the new cycle lapses...
    let midway = harness.now + Duration::hours(12);
    assert!(harness.engine.run_sweep(midway).unwrap().events.is_empty());

    // ...then exactly one more overdue event
    let lapsed = harness.now + Duration::days(1) + Duration::minutes(1);
    let second = harness.engine.run_sweep(lapsed).unwrap();
    assert_eq!(second.events.len(), 1);
    assert_eq!(second.events[0].schedule_id, id);
}

#[tokio::test]
async fn runner_delivers_events_to_the_dispatch_channel() {
    use reprise_core::SweepRunner;
    use std::sync::Arc;

    let harness = TestHarness::with_immediate_notifications();
    harness.seed_schedule("amara", -10);

    let TestHarness { engine, .. } = harness;
    let runner = SweepRunner::new(Arc::new(engine), std::time::Duration::from_millis(10));
    let (handle, mut rx) = runner.spawn(8);

    let event = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
        .await
        .expect("no event within timeout")
        .expect("channel closed");
    assert_eq!(event.student_id, "amara");
    assert_eq!(event.kind, NotificationKind::Overdue);

    drop(rx);
    let _ = handle.await;
}
