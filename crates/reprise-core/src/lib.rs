//! # Reprise Core
//!
//! Spaced-repetition review scheduler and notification timing engine.
//! Given a learner's feedback on a studied item (AGAIN/HARD/GOOD/EASY),
//! this crate computes when the item is next due, updates confidence
//! metrics, ranks due items into a priority queue, and decides whether and
//! when to raise overdue/reminder events - honoring quiet hours and
//! anti-spam thresholds.
//!
//! - **ScheduleCalculator**: feedback-driven interval state machine with an
//!   SM-2-style ease factor floored at 1.3
//! - **RetentionEstimator**: exponential forgetting-curve recall estimate
//! - **PriorityRanker**: deterministic high/medium/low review queue
//! - **QuietHoursGate**: midnight-wrapping do-not-disturb window
//! - **NotificationScheduler**: per-learner tick with a
//!   `(schedule, kind, due cycle)` sent log so nothing fires twice
//!
//! Persistence and delivery are external collaborators: schedules live
//! behind the `ScheduleStore` trait, and decided `NotificationEvent`s are
//! handed to whatever dispatch channel the surrounding service wires up.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::Utc;
//! use reprise_core::prelude::*;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let engine = ReviewEngine::new(store.clone(), store.clone(), EngineConfig::default());
//!
//! // A learner encounters an item for the first time
//! let now = Utc::now();
//! let schedule = ReviewSchedule::new("student-1", "item-1", DifficultyLevel::Beginner, now);
//! let schedule_id = schedule.schedule_id.clone();
//! store.upsert(schedule)?;
//!
//! // They review it and grade themselves
//! let feedback = ReviewFeedback::graded(Quality::Good).with_confidence(4);
//! let updated = engine.submit_feedback("student-1", &schedule_id, &feedback, now)?;
//! assert_eq!(updated.review_count, 1);
//!
//! // What should they study right now?
//! let queue = engine.due_queue("student-1", now)?;
//! assert_eq!(queue.total_count, 1);
//! # Ok::<(), reprise_core::EngineError>(())
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod engine;
pub mod notify;
pub mod queue;
pub mod retention;
pub mod schedule;
pub mod session;
pub mod store;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Scheduling state machine
pub use schedule::{
    days_to_duration, DifficultyLevel, Quality, ReviewFeedback, ReviewSchedule,
    ScheduleCalculator, ScheduleError, SchedulerConfig, EASE_FLOOR,
};

// Retention estimate
pub use retention::estimate as estimate_retention;

// Priority queue
pub use queue::{rank, DueQueue, Priority, RankedReview};

// Notification timing
pub use notify::{
    is_quiet, NotificationEvent, NotificationKind, NotificationScheduler, NotificationSettings,
    NotifyError, QuietHours, SettingsError, MAX_THRESHOLD_MINUTES,
};

// Review session state machine
pub use session::{ReviewSession, SessionError, SessionState};

// Store boundary
pub use store::{InMemoryStore, ScheduleStore, SettingsSource, StoreError};

// Engine facade
pub use engine::{EngineConfig, EngineError, ReviewEngine, SweepReport, SweepRunner};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        DifficultyLevel, DueQueue, EngineConfig, InMemoryStore, NotificationEvent,
        NotificationKind, NotificationScheduler, NotificationSettings, Priority, Quality,
        QuietHours, RankedReview, ReviewEngine, ReviewFeedback, ReviewSchedule, ReviewSession,
        ScheduleCalculator, ScheduleStore, SessionState, SettingsSource, SweepRunner,
    };
}
