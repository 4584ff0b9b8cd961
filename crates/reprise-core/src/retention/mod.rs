//! Retention Estimator
//!
//! Pure exponential forgetting curve: the probability a learner still
//! recalls an item decays with time elapsed since the current interval was
//! set, scaled inversely by the ease factor (higher ease assumes slower
//! forgetting).
//!
//! `p = exp(-elapsed_ratio / ease)` where
//! `elapsed_ratio = max(0, elapsed / interval)`.
//!
//! Total over malformed input: negative elapsed time, non-positive
//! intervals, and sub-floor ease factors are normalized before computing,
//! so the estimate never fails and always lands in [0, 1].

use chrono::{DateTime, Utc};

use crate::schedule::{ReviewSchedule, EASE_FLOOR};

/// Estimate the probability the learner still recalls the item at `now`.
///
/// Deterministic and side-effect free; result is always within [0, 1] and
/// monotonically non-increasing in elapsed time for a fixed schedule.
pub fn estimate(schedule: &ReviewSchedule, now: DateTime<Utc>) -> f64 {
    let interval_days = schedule.interval_days.max(0.0);
    let ease = schedule.ease_factor.max(EASE_FLOOR);

    let elapsed_days = (now - schedule.last_reviewed_at).num_seconds() as f64 / 86_400.0;

    // A zero interval means the interval was set this instant; nothing has
    // been scheduled to decay against yet.
    let elapsed_ratio = if interval_days > 0.0 {
        (elapsed_days / interval_days).max(0.0)
    } else {
        0.0
    };

    (-elapsed_ratio / ease).exp().clamp(0.0, 1.0)
}

// ============================================================================
// TESTS
// ============================================================================
