//! Notification Scheduler
//!
//! The one stateful component of the engine. A periodic sweep calls
//! `tick` once per learner; the scheduler classifies that learner's
//! schedules as overdue/upcoming, applies the quiet-hours gate and the
//! anti-spam delay/advance thresholds, and emits at most one event per
//! schedule per kind per due cycle.
//!
//! The sent log is keyed `(schedule_id, kind, next_review_at)`, so a
//! schedule cannot re-trigger the same kind until its due time changes
//! again. The log is partitioned per learner behind its own mutex:
//! overlapping ticks for the same learner serialize, ticks for different
//! learners run independently.
//!
//! Quiet hours defer rather than drop - a quiet tick emits nothing and
//! records nothing, so the same candidates re-fire on the first tick after
//! the window ends without counting against the thresholds a second time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

use super::quiet::is_quiet;
use super::settings::{NotificationSettings, SettingsError};
use crate::schedule::ReviewSchedule;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors from a notification tick
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The learner's settings record failed validation; this learner's
    /// tick is skipped, the sweep continues for everyone else
    #[error("Invalid notification settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    /// Lock poisoned during concurrent access
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type for notification operations
pub type Result<T> = std::result::Result<T, NotifyError>;

// ============================================================================
// EVENT TYPES
// ============================================================================

/// What kind of timing condition fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// The scheduled review time passed at least `overdue_delay_minutes` ago
    Overdue,
    /// The review comes due within `reminder_advance_minutes`
    Reminder,
}

impl NotificationKind {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Overdue => "overdue",
            NotificationKind::Reminder => "reminder",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One decided notification, handed to the external dispatch channel.
///
/// This core decides whether and when; delivery (push/email/SMS) is the
/// collaborator's problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// Schedule that satisfied the trigger condition
    pub schedule_id: String,
    /// Learner to notify
    pub student_id: String,
    /// Which condition fired
    pub kind: NotificationKind,
    /// When the decision was made
    pub triggered_at: DateTime<Utc>,
}

/// Sent-log key: one entry per (schedule, kind, due cycle)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SentKey {
    schedule_id: String,
    kind: NotificationKind,
    due_at: DateTime<Utc>,
}

type LearnerLog = Arc<Mutex<HashSet<SentKey>>>;

// ============================================================================
// SCHEDULER
// ============================================================================

/// Stateful notification coordinator owning the per-learner sent log.
#[derive(Debug, Default)]
pub struct NotificationScheduler {
    sent: RwLock<HashMap<String, LearnerLog>>,
}

impl NotificationScheduler {
    /// Scheduler with an empty sent log
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one learner's schedules against their settings.
    ///
    /// Quiet hours are judged against the wall-clock time of `now`; callers
    /// serving learners in other timezones convert `now` into the learner's
    /// local offset before the tick. Candidate evaluation is idempotent -
    /// re-running the same tick after a partial sweep cannot double-send.
    pub fn tick(
        &self,
        student_id: &str,
        schedules: &[ReviewSchedule],
        settings: &NotificationSettings,
        now: DateTime<Utc>,
    ) -> Result<Vec<NotificationEvent>> {
        settings.validate()?;

        if !settings.any_enabled() {
            return Ok(Vec::new());
        }

        let log = self.learner_log(student_id)?;
        let mut log = log
            .lock()
            .map_err(|e| NotifyError::LockPoisoned(e.to_string()))?;

        Self::prune_stale_cycles(&mut log, schedules);

        // Defer, not drop: nothing is emitted and nothing is marked sent,
        // so the same candidates re-fire once the window ends.
        if is_quiet(&settings.quiet_hours, now.time()) {
            return Ok(Vec::new());
        }

        let mut events = Vec::new();

        for schedule in schedules {
            if settings.overdue_enabled {
                let overdue_by = now - schedule.next_review_at;
                if overdue_by >= chrono::Duration::minutes(settings.overdue_delay_minutes as i64) {
                    self.emit(
                        &mut log,
                        schedule,
                        NotificationKind::Overdue,
                        now,
                        &mut events,
                    );
                }
            }

            if settings.reminder_enabled {
                let until_due = schedule.next_review_at - now;
                if until_due > chrono::Duration::zero()
                    && until_due
                        <= chrono::Duration::minutes(settings.reminder_advance_minutes as i64)
                {
                    self.emit(
                        &mut log,
                        schedule,
                        NotificationKind::Reminder,
                        now,
                        &mut events,
                    );
                }
            }
        }

        Ok(events)
    }

    /// Number of due cycles currently tracked for a learner
    pub fn tracked_cycles(&self, student_id: &str) -> Result<usize> {
        let logs = self
            .sent
            .read()
            .map_err(|e| NotifyError::LockPoisoned(e.to_string()))?;
        match logs.get(student_id) {
            Some(log) => Ok(log
                .lock()
                .map_err(|e| NotifyError::LockPoisoned(e.to_string()))?
                .len()),
            None => Ok(0),
        }
    }

    fn emit(
        &self,
        log: &mut HashSet<SentKey>,
        schedule: &ReviewSchedule,
        kind: NotificationKind,
        now: DateTime<Utc>,
        events: &mut Vec<NotificationEvent>,
    ) {
        let key = SentKey {
            schedule_id: schedule.schedule_id.clone(),
            kind,
            due_at: schedule.next_review_at,
        };

        // Already fired for this due cycle
        if !log.insert(key) {
            return;
        }

        tracing::debug!(
            schedule_id = %schedule.schedule_id,
            student_id = %schedule.student_id,
            kind = %kind,
            "notification triggered"
        );

        events.push(NotificationEvent {
            schedule_id: schedule.schedule_id.clone(),
            student_id: schedule.student_id.clone(),
            kind,
            triggered_at: now,
        });
    }

    /// Drop log entries whose schedule has since moved to a new due cycle.
    /// Entries for schedules absent from this tick are kept; the schedule
    /// may simply be filtered out of the current batch.
    fn prune_stale_cycles(log: &mut HashSet<SentKey>, schedules: &[ReviewSchedule]) {
        let current: HashMap<&str, DateTime<Utc>> = schedules
            .iter()
            .map(|s| (s.schedule_id.as_str(), s.next_review_at))
            .collect();

        log.retain(|key| match current.get(key.schedule_id.as_str()) {
            Some(due_at) => *due_at == key.due_at,
            None => true,
        });
    }

    fn learner_log(&self, student_id: &str) -> Result<LearnerLog> {
        {
            let logs = self
                .sent
                .read()
                .map_err(|e| NotifyError::LockPoisoned(e.to_string()))?;
            if let Some(log) = logs.get(student_id) {
                return Ok(Arc::clone(log));
            }
        }

        let mut logs = self
            .sent
            .write()
            .map_err(|e| NotifyError::LockPoisoned(e.to_string()))?;
        Ok(Arc::clone(logs.entry(student_id.to_string()).or_default()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
