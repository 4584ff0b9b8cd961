//! Notification Settings
//!
//! One record per learner, read from an external settings store and treated
//! as read-only per tick. `"HH:MM"` wall-clock strings are parsed and
//! bounds are checked here, at configuration-load time; the quiet-hours
//! gate and the scheduler assume an already-valid record.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for the delay/advance thresholds, in minutes (one day)
pub const MAX_THRESHOLD_MINUTES: u32 = 1440;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors from validating a learner's notification settings
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A quiet-hours bound is not a valid "HH:MM" wall-clock time
    #[error("Invalid time of day {0:?}: expected \"HH:MM\"")]
    InvalidTimeOfDay(String),

    /// A delay/advance threshold is outside [0, 1440]
    #[error("{field} is {value} minutes, outside 0-{MAX_THRESHOLD_MINUTES}")]
    ThresholdOutOfRange {
        /// Which threshold failed
        field: &'static str,
        /// Value found on the record
        value: u32,
    },
}

// ============================================================================
// QUIET HOURS
// ============================================================================

/// A do-not-disturb window in local wall-clock time.
///
/// The window is `[start, end)` and may wrap midnight: `start > end` means
/// it spans across 00:00 (e.g. 22:00-08:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuietHours {
    /// Window start (inclusive)
    pub start: NaiveTime,
    /// Window end (exclusive)
    pub end: NaiveTime,
    /// Whether the window is honored at all
    pub enabled: bool,
}

impl QuietHours {
    /// Parse a window from `"HH:MM"` bounds.
    ///
    /// This is the only place malformed time strings are handled; the gate
    /// itself is total.
    pub fn parse(start: &str, end: &str, enabled: bool) -> Result<Self, SettingsError> {
        Ok(Self {
            start: parse_hh_mm(start)?,
            end: parse_hh_mm(end)?,
            enabled,
        })
    }

    /// A disabled window that never suppresses anything
    pub fn disabled() -> Self {
        Self {
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
            enabled: false,
        }
    }
}

fn parse_hh_mm(s: &str) -> Result<NaiveTime, SettingsError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| SettingsError::InvalidTimeOfDay(s.to_string()))
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Per-learner notification preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Raise events for overdue reviews
    pub overdue_enabled: bool,
    /// Raise events ahead of upcoming reviews
    pub reminder_enabled: bool,
    /// How overdue a review must be before an event fires, in minutes
    pub overdue_delay_minutes: u32,
    /// How far ahead of the due time a reminder may fire, in minutes
    pub reminder_advance_minutes: u32,
    /// Do-not-disturb window
    pub quiet_hours: QuietHours,
}

impl NotificationSettings {
    /// Check the bounds invariants on a record loaded from the settings
    /// store. A failing record isolates its learner's tick; it never stops
    /// the sweep for other learners.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.overdue_delay_minutes > MAX_THRESHOLD_MINUTES {
            return Err(SettingsError::ThresholdOutOfRange {
                field: "overdueDelayMinutes",
                value: self.overdue_delay_minutes,
            });
        }
        if self.reminder_advance_minutes > MAX_THRESHOLD_MINUTES {
            return Err(SettingsError::ThresholdOutOfRange {
                field: "reminderAdvanceMinutes",
                value: self.reminder_advance_minutes,
            });
        }
        Ok(())
    }

    /// Whether any notification kind is switched on
    pub fn any_enabled(&self) -> bool {
        self.overdue_enabled || self.reminder_enabled
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            overdue_enabled: true,
            reminder_enabled: true,
            overdue_delay_minutes: 30,
            reminder_advance_minutes: 15,
            quiet_hours: QuietHours::disabled(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
