//! Review Engine
//!
//! The composing facade behind whatever API/transport the surrounding
//! service chooses:
//!
//! - `submit_feedback` - synchronous request path; applies one feedback
//!   grade and persists the updated record as a single atomic write
//! - `due_queue` - ranks a learner's schedules into the consumption queue
//! - `run_sweep` - one pass over all learners with pending items, applying
//!   the notification tick with per-learner error isolation
//! - `SweepRunner` - periodic tokio loop pushing decided events into an
//!   mpsc channel, the boundary to the external dispatch service
//!
//! Configuration is an injected value; nothing in here reads process-wide
//! state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::notify::{NotificationEvent, NotificationScheduler, NotificationSettings, NotifyError};
use crate::queue::{self, DueQueue};
use crate::schedule::{ReviewFeedback, ReviewSchedule, ScheduleCalculator, ScheduleError};
use crate::store::{ScheduleStore, SettingsSource, StoreError};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors surfaced on the request path.
///
/// Sweep-side failures never appear here; they are logged and retried on
/// the next cycle, invisible to end users.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EngineError {
    /// Feedback was rejected; a client/data bug, never retried automatically
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// The persistence collaborator raised
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A notification tick failed outside the sweep path
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Injected engine configuration - replaces ambient feature flags
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Interval state-machine tunables
    pub scheduler: crate::schedule::SchedulerConfig,
    /// Settings applied to learners without a customized record
    pub default_settings: NotificationSettings,
}

// ============================================================================
// SWEEP REPORT
// ============================================================================

/// Outcome of one sweep pass
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Learners whose tick completed
    pub students_processed: usize,
    /// Learners skipped this pass (bad settings or store failure); their
    /// schedules are re-evaluated on the next sweep
    pub students_skipped: usize,
    /// Events decided this pass, in emission order
    pub events: Vec<NotificationEvent>,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Scheduling engine composing the calculator, ranker, and notifier over
/// the store boundary.
pub struct ReviewEngine {
    store: Arc<dyn ScheduleStore>,
    settings: Arc<dyn SettingsSource>,
    calculator: ScheduleCalculator,
    notifier: NotificationScheduler,
    default_settings: NotificationSettings,
}

impl ReviewEngine {
    /// Build an engine over the given collaborators
    pub fn new(
        store: Arc<dyn ScheduleStore>,
        settings: Arc<dyn SettingsSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            settings,
            calculator: ScheduleCalculator::with_config(config.scheduler),
            notifier: NotificationScheduler::new(),
            default_settings: config.default_settings,
        }
    }

    /// Apply one feedback submission for a learner.
    ///
    /// Synchronous request path: load, apply, persist the single updated
    /// record, return it. Does not touch the notification side; stale sent
    /// log entries for the old due cycle are pruned on the next tick.
    pub fn submit_feedback(
        &self,
        student_id: &str,
        schedule_id: &str,
        feedback: &ReviewFeedback,
        now: DateTime<Utc>,
    ) -> Result<ReviewSchedule> {
        let schedule = self.store.get(schedule_id)?;
        if schedule.student_id != student_id {
            // Do not leak other learners' schedule state
            return Err(StoreError::NotFound(schedule_id.to_string()).into());
        }

        let updated = self.calculator.apply(&schedule, feedback, now)?;
        self.store.upsert(updated.clone())?;

        tracing::debug!(
            schedule_id = %schedule_id,
            student_id = %student_id,
            quality = %feedback.quality,
            interval_days = updated.interval_days,
            "feedback applied"
        );

        Ok(updated)
    }

    /// Priority-ordered due queue for one learner
    pub fn due_queue(&self, student_id: &str, now: DateTime<Utc>) -> Result<DueQueue> {
        let schedules = self.store.schedules_for_student(student_id)?;
        Ok(queue::rank(&schedules, now))
    }

    /// Notification tick for one learner
    pub fn tick_student(
        &self,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<NotificationEvent>> {
        let schedules = self.store.schedules_for_student(student_id)?;
        let settings = self
            .settings
            .settings_for(student_id)?
            .unwrap_or_else(|| self.default_settings.clone());
        Ok(self.notifier.tick(student_id, &schedules, &settings, now)?)
    }

    /// One sweep over every learner with schedules.
    ///
    /// A learner whose settings record is malformed, or whose store read
    /// raises, is skipped with a warning; the sweep continues for everyone
    /// else and the skipped learner is retried next cycle. Each candidate
    /// evaluation is idempotent, so retries never double-send.
    pub fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let mut report = SweepReport::default();

        for student_id in self.store.student_ids()? {
            match self.tick_student(&student_id, now) {
                Ok(mut events) => {
                    report.students_processed += 1;
                    report.events.append(&mut events);
                }
                Err(err) => {
                    report.students_skipped += 1;
                    tracing::warn!(
                        student_id = %student_id,
                        error = %err,
                        "skipping learner this sweep"
                    );
                }
            }
        }

        Ok(report)
    }
}

// ============================================================================
// SWEEP RUNNER
// ============================================================================

/// Periodic sweep loop.
///
/// Ticks at a fixed period and forwards decided events into an mpsc
/// channel; the receiving side is the external dispatch service (push,
/// email, SMS - not this crate's concern). Dropping the receiver stops the
/// loop.
pub struct SweepRunner {
    engine: Arc<ReviewEngine>,
    period: std::time::Duration,
}

impl SweepRunner {
    /// Runner sweeping at the given period
    pub fn new(engine: Arc<ReviewEngine>, period: std::time::Duration) -> Self {
        Self { engine, period }
    }

    /// Spawn the sweep loop, returning its join handle and the event
    /// channel receiver.
    pub fn spawn(
        self,
        channel_capacity: usize,
    ) -> (
        tokio::task::JoinHandle<()>,
        mpsc::Receiver<NotificationEvent>,
    ) {
        let (tx, rx) = mpsc::channel(channel_capacity);
        let handle = tokio::spawn(self.run(tx));
        (handle, rx)
    }

    async fn run(self, tx: mpsc::Sender<NotificationEvent>) {
        let mut ticker = tokio::time::interval(self.period);
        // A delayed sweep should not burst; the next cycle re-evaluates
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if tx.is_closed() {
                tracing::debug!("event channel closed; stopping sweep loop");
                return;
            }

            let report = match self.engine.run_sweep(Utc::now()) {
                Ok(report) => report,
                Err(err) => {
                    tracing::warn!(error = %err, "sweep failed; retrying next cycle");
                    continue;
                }
            };

            for event in report.events {
                if tx.send(event).await.is_err() {
                    tracing::debug!("event channel closed; stopping sweep loop");
                    return;
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
