//! Priority Ranker
//!
//! Pure projection of a learner's schedules into a priority-ordered review
//! queue. Nothing here mutates the input records; the queue is rebuilt from
//! scratch on every call so repeated ranking of the same input is
//! deterministic.
//!
//! Classification per schedule:
//! - High: overdue, or a failure streak of two or more
//! - Medium: due within the upcoming window (60 minutes)
//! - Low: everything else
//!
//! Ordering: priority tier, then ascending minutes-until-due (most overdue
//! first within a tier), then schedule id as a deterministic tie-break.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::retention;
use crate::schedule::ReviewSchedule;

/// Due-within window that promotes a schedule to Medium, in minutes
const UPCOMING_WINDOW_MINUTES: i64 = 60;

/// Failure streak that promotes a schedule to High
const HIGH_PRIORITY_FAILURE_STREAK: u32 = 2;

// ============================================================================
// PRIORITY
// ============================================================================

/// Coarse ranking bucket for the due-review queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Not due soon
    Low = 1,
    /// Due within the upcoming window
    Medium = 2,
    /// Overdue or repeatedly failed
    High = 3,
}

impl Priority {
    /// Classify one schedule at the given instant
    pub fn classify(schedule: &ReviewSchedule, now: DateTime<Utc>) -> Self {
        if schedule.is_overdue(now)
            || schedule.consecutive_failures >= HIGH_PRIORITY_FAILURE_STREAK
        {
            Priority::High
        } else if schedule.minutes_until_due(now) <= UPCOMING_WINDOW_MINUTES {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

// ============================================================================
// QUEUE TYPES
// ============================================================================

/// One ranked entry in the due queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedReview {
    /// The underlying schedule, unmodified
    pub schedule: ReviewSchedule,
    /// Assigned priority tier
    pub priority: Priority,
    /// Minutes until due; negative when overdue
    pub minutes_until_due: i64,
    /// Whether the scheduled time has passed
    pub is_overdue: bool,
    /// Forgetting-curve estimate at ranking time (derived, not persisted)
    pub retention_probability: f64,
}

/// A learner's priority-ordered review queue with summary counts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueQueue {
    /// Entries in consumption order
    pub reviews: Vec<RankedReview>,
    /// Total entries ranked
    pub total_count: usize,
    /// Entries in the High tier
    pub high_priority_count: usize,
    /// Entries whose scheduled time has passed
    pub overdue_count: usize,
    /// Entries due within the upcoming window (0 < minutes <= 60)
    pub upcoming_count: usize,
}

// ============================================================================
// RANKER
// ============================================================================

/// Rank a set of schedules into a priority-ordered queue.
///
/// Pure: input records are cloned into the queue, never mutated. The order
/// is total - tier, then minutes ascending, then schedule id - so two calls
/// over the same input produce identical queues.
pub fn rank(schedules: &[ReviewSchedule], now: DateTime<Utc>) -> DueQueue {
    let mut reviews: Vec<RankedReview> = schedules
        .iter()
        .map(|schedule| {
            let minutes_until_due = schedule.minutes_until_due(now);
            RankedReview {
                priority: Priority::classify(schedule, now),
                minutes_until_due,
                is_overdue: schedule.is_overdue(now),
                retention_probability: retention::estimate(schedule, now),
                schedule: schedule.clone(),
            }
        })
        .collect();

    reviews.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(a.minutes_until_due.cmp(&b.minutes_until_due))
            .then(a.schedule.schedule_id.cmp(&b.schedule.schedule_id))
    });

    let high_priority_count = reviews
        .iter()
        .filter(|r| r.priority == Priority::High)
        .count();
    let overdue_count = reviews.iter().filter(|r| r.is_overdue).count();
    let upcoming_count = reviews
        .iter()
        .filter(|r| r.minutes_until_due > 0 && r.minutes_until_due <= UPCOMING_WINDOW_MINUTES)
        .count();

    DueQueue {
        total_count: reviews.len(),
        high_priority_count,
        overdue_count,
        upcoming_count,
        reviews,
    }
}

// ============================================================================
// TESTS
// ============================================================================
