//! Quiet Hours Gate
//!
//! Pure check of a local wall-clock time against a learner's do-not-disturb
//! window. Malformed windows cannot reach here - "HH:MM" parsing happens at
//! configuration load (`QuietHours::parse`) - so the gate is total with no
//! failure modes.

use chrono::NaiveTime;

use super::settings::QuietHours;

/// Whether `local_time` falls inside the quiet window.
///
/// Disabled windows never match. `start <= end` is a same-day range
/// `[start, end)`; `start > end` wraps midnight, so the window matches when
/// `t >= start || t < end`. An empty range (`start == end`) never matches.
pub fn is_quiet(window: &QuietHours, local_time: NaiveTime) -> bool {
    if !window.enabled {
        return false;
    }

    if window.start <= window.end {
        local_time >= window.start && local_time < window.end
    } else {
        local_time >= window.start || local_time < window.end
    }
}

// ============================================================================
// TESTS
// ============================================================================
