//! Test Data Factory
//!
//! Utilities for building realistic scheduling state:
//! - Engines wired over a shared in-memory store
//! - Schedules at chosen points in their lifecycle
//! - Batches spread across overdue/upcoming/distant buckets

use chrono::{DateTime, Duration, Utc};
use reprise_core::{
    DifficultyLevel, EngineConfig, InMemoryStore, NotificationSettings, ReviewEngine,
    ReviewSchedule, ScheduleStore,
};
use std::sync::Arc;

/// An engine plus direct access to the store backing it
pub struct TestHarness {
    /// Backing store, shared with the engine
    pub store: Arc<InMemoryStore>,
    /// Engine under test
    pub engine: ReviewEngine,
    /// Fixed clock the fixtures are seeded against
    pub now: DateTime<Utc>,
}

impl TestHarness {
    /// Engine with default configuration over a fresh in-memory store
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let engine = ReviewEngine::new(store.clone(), store.clone(), EngineConfig::default());
        Self {
            store,
            engine,
            now: Utc::now(),
        }
    }

    /// Engine with immediate notification thresholds (no delay/advance)
    pub fn with_immediate_notifications() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let engine = ReviewEngine::new(
            store.clone(),
            store.clone(),
            EngineConfig {
                default_settings: NotificationSettings {
                    overdue_delay_minutes: 0,
                    reminder_advance_minutes: 0,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        Self {
            store,
            engine,
            now: Utc::now(),
        }
    }

    /// Seed a schedule due at an offset (negative = already overdue)
    /// from the harness clock, returning its id.
    pub fn seed_schedule(&self, student_id: &str, due_offset_minutes: i64) -> String {
        self.seed_schedule_with(student_id, due_offset_minutes, 4.0, 2.5)
    }

    /// Seed a schedule with explicit interval and ease
    pub fn seed_schedule_with(
        &self,
        student_id: &str,
        due_offset_minutes: i64,
        interval_days: f64,
        ease_factor: f64,
    ) -> String {
        let mut schedule = ReviewSchedule::new(
            student_id,
            format!("item-{}", self.store.len()),
            DifficultyLevel::Intermediate,
            self.now,
        );
        schedule.interval_days = interval_days;
        schedule.ease_factor = ease_factor;
        schedule.next_review_at = self.now + Duration::minutes(due_offset_minutes);
        let id = schedule.schedule_id.clone();
        self.store.upsert(schedule).expect("seed schedule");
        id
    }

    /// Seed one learner with a mix of overdue, upcoming, and distant items
    pub fn seed_mixed_batch(&self, student_id: &str) -> Vec<String> {
        [-300, -30, 15, 45, 300, 2000]
            .iter()
            .map(|&offset| self.seed_schedule(student_id, offset))
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
