//! Review Schedule - The fundamental unit of scheduling state
//!
//! One record per (learner, studied item) holding:
//! - The current review interval and ease factor
//! - Failure streak and lifetime review counters
//! - The timestamps the retention estimate decays between

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest permitted ease factor. An input record below this floor is a
/// data-corruption signal, not a schedulable state.
pub const EASE_FLOOR: f64 = 1.3;

/// Convert a day-denominated interval into a wall-clock span.
///
/// Intervals are stored as fractional days (AGAIN/HARD intervals are
/// minute-scale fractions). Every conversion to an actual timestamp goes
/// through here so day/minute unit confusion cannot creep into call sites.
pub fn days_to_duration(days: f64) -> Duration {
    Duration::seconds((days.max(0.0) * 86_400.0).round() as i64)
}

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Authoring-time difficulty of a studied item.
///
/// Set when the item is created and immutable here; the scheduler reads it
/// but never rewrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    /// Introductory material
    #[default]
    Beginner,
    /// Standard material
    Intermediate,
    /// Advanced material
    Advanced,
}

impl DifficultyLevel {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// QUALITY
// ============================================================================

/// The four-grade feedback scale a learner submits after a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quality {
    /// Failed to recall; resurface within the session
    Again,
    /// Recalled with serious difficulty; resurface soon
    Hard,
    /// Recalled correctly; keep the current pace
    Good,
    /// Recalled effortlessly; grow the interval
    Easy,
}

impl Quality {
    /// Convert to the wire-format string
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Again => "AGAIN",
            Quality::Hard => "HARD",
            Quality::Good => "GOOD",
            Quality::Easy => "EASY",
        }
    }

    /// Parse from a wire-format name. Returns `None` for anything outside
    /// the four enumerated grades; the calculator maps that to
    /// `ScheduleError::InvalidFeedback` at the API boundary.
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "AGAIN" => Some(Quality::Again),
            "HARD" => Some(Quality::Hard),
            "GOOD" => Some(Quality::Good),
            "EASY" => Some(Quality::Easy),
            _ => None,
        }
    }

    /// Whether this grade counts as a successful recall
    pub fn is_success(&self) -> bool {
        !matches!(self, Quality::Again)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// REVIEW SCHEDULE
// ============================================================================

/// Scheduling state for one (learner, item) pair.
///
/// Mutated exclusively by `ScheduleCalculator::apply` in response to a
/// `ReviewFeedback`; never deleted by this subsystem. The retention
/// probability is derived on read (see the `retention` module) and is not
/// stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    /// Unique identifier (UUID v4)
    pub schedule_id: String,
    /// Learner this schedule belongs to
    pub student_id: String,
    /// Studied item this schedule tracks
    pub item_id: String,
    /// When the item is next due for review
    pub next_review_at: DateTime<Utc>,
    /// Current interval in days; fractional for sub-day intervals
    pub interval_days: f64,
    /// Ease multiplier controlling interval growth; never below `EASE_FLOOR`
    pub ease_factor: f64,
    /// Lifetime feedback submissions for this item
    pub review_count: u32,
    /// Consecutive AGAIN grades; reset by any successful recall
    pub consecutive_failures: u32,
    /// Authoring-time difficulty, immutable here
    pub difficulty_level: DifficultyLevel,
    /// When the current interval was set; anchor for retention decay
    pub last_reviewed_at: DateTime<Utc>,
}

impl ReviewSchedule {
    /// Create a fresh schedule for an item a learner just encountered.
    ///
    /// Starts due immediately with a zero interval and the conventional
    /// 2.5 starting ease.
    pub fn new(
        student_id: impl Into<String>,
        item_id: impl Into<String>,
        difficulty_level: DifficultyLevel,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            schedule_id: Uuid::new_v4().to_string(),
            student_id: student_id.into(),
            item_id: item_id.into(),
            next_review_at: now,
            interval_days: 0.0,
            ease_factor: 2.5,
            review_count: 0,
            consecutive_failures: 0,
            difficulty_level,
            last_reviewed_at: now,
        }
    }

    /// Whether the scheduled review time has already passed
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at < now
    }

    /// Minutes until the item is due; negative when overdue
    pub fn minutes_until_due(&self, now: DateTime<Utc>) -> i64 {
        (self.next_review_at - now).num_minutes()
    }

    /// The current interval as a wall-clock span
    pub fn interval(&self) -> Duration {
        days_to_duration(self.interval_days)
    }
}

// ============================================================================
// REVIEW FEEDBACK
// ============================================================================

/// One feedback submission for a reviewed item.
///
/// Ephemeral - consumed by `ScheduleCalculator::apply` and not retained.
/// Uses `deny_unknown_fields` to reject malformed submissions at the
/// deserialization boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewFeedback {
    /// Recall grade
    pub quality: Quality,
    /// How long the learner took to answer, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_seconds: Option<f64>,
    /// Self-reported confidence, 1-5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

impl ReviewFeedback {
    /// Feedback carrying only a grade
    pub fn graded(quality: Quality) -> Self {
        Self {
            quality,
            response_time_seconds: None,
            confidence: None,
        }
    }

    /// Attach a response time
    pub fn with_response_time(mut self, seconds: f64) -> Self {
        self.response_time_seconds = Some(seconds);
        self
    }

    /// Attach a confidence rating
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================
