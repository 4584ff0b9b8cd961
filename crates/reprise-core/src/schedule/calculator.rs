//! Schedule Calculator - feedback-driven interval state machine
//!
//! Applies one `ReviewFeedback` to a `ReviewSchedule` and produces the
//! updated record. The grade table:
//!
//! | quality | interval            | ease          | failures |
//! |---------|---------------------|---------------|----------|
//! | AGAIN   | ~1 minute           | -0.20 (floor) | +1       |
//! | HARD    | ~6 minutes          | -0.15 (floor) | reset    |
//! | GOOD    | unchanged (or seed) | unchanged     | reset    |
//! | EASY    | round(interval*ease)| +0.15         | reset    |
//!
//! AGAIN/HARD use sub-day intervals so the item resurfaces within the same
//! session; GOOD/EASY use day-granularity intervals that grow across
//! successive successes. The ease factor is floored at `EASE_FLOOR` and has
//! no ceiling (see `SchedulerConfig::ease_bonus`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::{days_to_duration, Quality, ReviewFeedback, ReviewSchedule, EASE_FLOOR};

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Relearning interval after AGAIN, as a day fraction (~1 minute)
const AGAIN_INTERVAL_DAYS: f64 = 1.0 / 1440.0;

/// Relearning interval after HARD, as a day fraction (~6 minutes)
const HARD_INTERVAL_DAYS: f64 = 6.0 / 1440.0;

/// First day-granularity interval after a successful recall
const SEED_INTERVAL_DAYS: f64 = 1.0;

/// Ease penalty for AGAIN
const AGAIN_EASE_PENALTY: f64 = 0.2;

/// Ease penalty for HARD
const HARD_EASE_PENALTY: f64 = 0.15;

/// Ease reward for EASY
const EASY_EASE_BONUS: f64 = 0.15;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors from applying feedback to a schedule
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Feedback payload failed validation
    #[error("Invalid feedback: {0}")]
    InvalidFeedback(String),

    /// Input record carries an ease factor below the floor; the stored
    /// state is corrupt and must not be advanced
    #[error("Corrupt schedule {schedule_id}: ease factor {ease_factor} below {EASE_FLOOR}")]
    CorruptEaseFactor {
        /// Offending schedule
        schedule_id: String,
        /// Ease factor found on the record
        ease_factor: f64,
    },
}

/// Result type for calculator operations
pub type Result<T> = std::result::Result<T, ScheduleError>;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Tunables for the interval state machine.
///
/// Injected explicitly into the calculator; defaults reproduce the standard
/// grade table above.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Interval after AGAIN, in days
    pub again_interval_days: f64,
    /// Interval after HARD, in days
    pub hard_interval_days: f64,
    /// First day-granularity interval after a success, in days
    pub seed_interval_days: f64,
    /// Ease subtracted on AGAIN
    pub again_ease_penalty: f64,
    /// Ease subtracted on HARD
    pub hard_ease_penalty: f64,
    /// Ease added on EASY. There is deliberately no ceiling: repeated EASY
    /// grades grow the ease without bound, which makes intervals grow
    /// super-exponentially. Callers wanting a cap should clamp in a wrapper.
    pub ease_bonus: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            again_interval_days: AGAIN_INTERVAL_DAYS,
            hard_interval_days: HARD_INTERVAL_DAYS,
            seed_interval_days: SEED_INTERVAL_DAYS,
            again_ease_penalty: AGAIN_EASE_PENALTY,
            hard_ease_penalty: HARD_EASE_PENALTY,
            ease_bonus: EASY_EASE_BONUS,
        }
    }
}

// ============================================================================
// CALCULATOR
// ============================================================================

/// The feedback-to-schedule state machine.
///
/// Stateless apart from its configuration; `apply` is a pure function of
/// `(schedule, feedback, now)` and is safe to call concurrently.
#[derive(Debug, Clone, Default)]
pub struct ScheduleCalculator {
    config: SchedulerConfig,
}

impl ScheduleCalculator {
    /// Calculator with the standard grade table
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator with custom tunables
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Apply one feedback submission, producing the updated record.
    ///
    /// The input is not mutated; the caller persists the returned record as
    /// a single atomic write. Fails without advancing any state when the
    /// feedback is malformed or the input record is corrupt.
    pub fn apply(
        &self,
        schedule: &ReviewSchedule,
        feedback: &ReviewFeedback,
        now: DateTime<Utc>,
    ) -> Result<ReviewSchedule> {
        Self::validate_feedback(feedback)?;

        if schedule.ease_factor < EASE_FLOOR {
            return Err(ScheduleError::CorruptEaseFactor {
                schedule_id: schedule.schedule_id.clone(),
                ease_factor: schedule.ease_factor,
            });
        }

        let mut updated = schedule.clone();

        match feedback.quality {
            Quality::Again => {
                updated.interval_days = self.config.again_interval_days;
                updated.ease_factor =
                    (schedule.ease_factor - self.config.again_ease_penalty).max(EASE_FLOOR);
                updated.consecutive_failures = schedule.consecutive_failures + 1;
            }
            Quality::Hard => {
                updated.interval_days = self.config.hard_interval_days;
                updated.ease_factor =
                    (schedule.ease_factor - self.config.hard_ease_penalty).max(EASE_FLOOR);
                updated.consecutive_failures = 0;
            }
            Quality::Good => {
                updated.interval_days = if schedule.interval_days < self.config.seed_interval_days {
                    // First day-granularity success: graduate out of the
                    // sub-day relearning range
                    self.config.seed_interval_days
                } else {
                    schedule.interval_days
                };
                updated.consecutive_failures = 0;
            }
            Quality::Easy => {
                updated.interval_days = (schedule.interval_days * schedule.ease_factor)
                    .round()
                    .max(self.config.seed_interval_days);
                updated.ease_factor = schedule.ease_factor + self.config.ease_bonus;
                updated.consecutive_failures = 0;
            }
        }

        updated.review_count = schedule.review_count + 1;
        updated.last_reviewed_at = now;
        updated.next_review_at = now + days_to_duration(updated.interval_days);

        Ok(updated)
    }

    fn validate_feedback(feedback: &ReviewFeedback) -> Result<()> {
        if let Some(confidence) = feedback.confidence {
            if !(1..=5).contains(&confidence) {
                return Err(ScheduleError::InvalidFeedback(format!(
                    "confidence {} outside 1-5",
                    confidence
                )));
            }
        }

        if let Some(seconds) = feedback.response_time_seconds {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(ScheduleError::InvalidFeedback(format!(
                    "response time {} is not a non-negative number",
                    seconds
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
