//! Review Journey
//!
//! Complete learner workflows: first encounter through repeated feedback,
//! interval growth, failure streaks, and the due queue a learner would see.

use chrono::Duration;
use reprise_e2e_tests::fixtures::TestHarness;
use reprise_core::{Priority, Quality, ReviewFeedback, ScheduleStore};

#[test]
fn easy_feedback_grows_interval_per_grade_table() {
    let harness = TestHarness::new();
    let id = harness.seed_schedule_with("amara", 0, 4.0, 2.5);

    // Push the record to the documented scenario state
    let mut schedule = harness.store.get(&id).unwrap();
    schedule.review_count = 8;
    harness.store.upsert(schedule).unwrap();

    let updated = harness
        .engine
        .submit_feedback("amara", &id, &ReviewFeedback::graded(Quality::Easy), harness.now)
        .unwrap();

    assert_eq!(updated.interval_days, 10.0);
    assert!((updated.ease_factor - 2.65).abs() < 1e-9);
    assert_eq!(updated.consecutive_failures, 0);
    assert_eq!(updated.review_count, 9);
    assert_eq!(updated.next_review_at, harness.now + Duration::days(10));
}

#[test]
fn failure_streak_floors_ease_and_ranks_high() {
    let harness = TestHarness::new();
    let id = harness.seed_schedule_with("amara", 0, 4.0, 1.6);

    let mut now = harness.now;
    for _ in 0..3 {
        harness
            .engine
            .submit_feedback("amara", &id, &ReviewFeedback::graded(Quality::Again), now)
            .unwrap();
        now += Duration::seconds(90);
    }

    let schedule = harness.store.get(&id).unwrap();
    assert_eq!(schedule.consecutive_failures, 3);
    // 1.6 -> 1.4 -> 1.3 -> floored at 1.3
    assert_eq!(schedule.ease_factor, 1.3);

    // A streak of two or more makes the item high priority even before
    // it comes due again
    let queue = harness.engine.due_queue("amara", now).unwrap();
    assert_eq!(queue.reviews[0].priority, Priority::High);
    assert_eq!(queue.high_priority_count, 1);
}

#[test]
fn relearning_item_resurfaces_within_the_session() {
    let harness = TestHarness::new();
    let id = harness.seed_schedule_with("amara", 0, 4.0, 2.5);

    let updated = harness
        .engine
        .submit_feedback("amara", &id, &ReviewFeedback::graded(Quality::Again), harness.now)
        .unwrap();

    // Due again one minute out, not four days out
    assert_eq!(updated.next_review_at, harness.now + Duration::seconds(60));

    // A couple minutes later the item is back at the top of the queue
    let later = harness.now + Duration::minutes(3);
    let queue = harness.engine.due_queue("amara", later).unwrap();
    assert_eq!(queue.reviews[0].schedule.schedule_id, id);
    assert!(queue.reviews[0].is_overdue);
}

#[test]
fn graduation_path_hard_then_good_then_easy() {
    let harness = TestHarness::new();
    let id = harness.seed_schedule_with("amara", 0, 0.0, 2.5);
    let mut now = harness.now;

    // Struggles at first: six-minute relearning interval
    let after_hard = harness
        .engine
        .submit_feedback("amara", &id, &ReviewFeedback::graded(Quality::Hard), now)
        .unwrap();
    assert!(after_hard.interval_days < 1.0);

    // Recalls it: graduates to the one-day seed interval
    now += Duration::minutes(6);
    let after_good = harness
        .engine
        .submit_feedback("amara", &id, &ReviewFeedback::graded(Quality::Good), now)
        .unwrap();
    assert_eq!(after_good.interval_days, 1.0);

    // Nails it the next day: interval multiplies by the ease factor
    now += Duration::days(1);
    let after_easy = harness
        .engine
        .submit_feedback("amara", &id, &ReviewFeedback::graded(Quality::Easy), now)
        .unwrap();
    assert!(after_easy.interval_days > after_good.interval_days);
    assert_eq!(after_easy.review_count, 3);
}

#[test]
fn due_queue_orders_and_counts_a_mixed_batch() {
    let harness = TestHarness::new();
    harness.seed_mixed_batch("amara");
    // Another learner's items must not leak into the queue
    harness.seed_schedule("bruno", -60);

    let queue = harness.engine.due_queue("amara", harness.now).unwrap();

    assert_eq!(queue.total_count, 6);
    assert_eq!(queue.overdue_count, 2);
    // 15 and 45 minutes out
    assert_eq!(queue.upcoming_count, 2);
    assert_eq!(queue.high_priority_count, 2);

    // Most overdue first, then the upcoming window, then the distant tail
    let minutes: Vec<i64> = queue.reviews.iter().map(|r| r.minutes_until_due).collect();
    assert_eq!(minutes, vec![-300, -30, 15, 45, 300, 2000]);

    // Every entry carries a live retention estimate
    assert!(queue
        .reviews
        .iter()
        .all(|r| (0.0..=1.0).contains(&r.retention_probability)));
}

#[test]
fn malformed_submission_is_rejected_without_side_effects() {
    let harness = TestHarness::new();
    let id = harness.seed_schedule("amara", 0);

    let bad = ReviewFeedback::graded(Quality::Good).with_confidence(0);
    assert!(harness
        .engine
        .submit_feedback("amara", &id, &bad, harness.now)
        .is_err());

    let schedule = harness.store.get(&id).unwrap();
    assert_eq!(schedule.review_count, 0);
    assert_eq!(schedule.next_review_at, harness.now);
}
