//! Store Boundary
//!
//! Persistence is an external collaborator; this module defines the
//! contract the engine needs from it and ships an in-memory reference
//! implementation used by tests and single-process deployments.
//!
//! The engine assumes store calls either succeed or raise. On a raise it
//! does not advance state for that record and retries on the next tick;
//! `ScheduleCalculator::apply` produces a single atomic record, so there
//! are never partial writes to roll back.

use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

use crate::notify::NotificationSettings;
use crate::schedule::ReviewSchedule;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors surfaced by a schedule store
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// Schedule not found
    #[error("Schedule not found: {0}")]
    NotFound(String),

    /// Lock poisoned during concurrent access
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// Backend-specific transient failure; retried on the next sweep
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// TRAITS
// ============================================================================

/// Contract for the external schedule record store.
///
/// `&self` methods only - implementations use interior mutability so the
/// engine can hold the store behind an `Arc` and stay `Send + Sync`.
pub trait ScheduleStore: Send + Sync {
    /// Fetch one schedule by id
    fn get(&self, schedule_id: &str) -> Result<ReviewSchedule>;

    /// Write one schedule as a single atomic record
    fn upsert(&self, schedule: ReviewSchedule) -> Result<()>;

    /// All schedules belonging to a learner
    fn schedules_for_student(&self, student_id: &str) -> Result<Vec<ReviewSchedule>>;

    /// Learners with at least one schedule; the sweep iterates these
    fn student_ids(&self) -> Result<Vec<String>>;
}

/// Read-only lookup of per-learner notification settings.
///
/// `None` means the learner keeps the defaults.
pub trait SettingsSource: Send + Sync {
    /// Settings for one learner, if customized
    fn settings_for(&self, student_id: &str) -> Result<Option<NotificationSettings>>;
}

// ============================================================================
// IN-MEMORY IMPLEMENTATION
// ============================================================================

/// In-memory `ScheduleStore` and `SettingsSource`
#[derive(Debug, Default)]
pub struct InMemoryStore {
    schedules: RwLock<HashMap<String, ReviewSchedule>>,
    settings: RwLock<HashMap<String, NotificationSettings>>,
}

impl InMemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Install custom settings for a learner
    pub fn put_settings(&self, student_id: impl Into<String>, settings: NotificationSettings) {
        if let Ok(mut map) = self.settings.write() {
            map.insert(student_id.into(), settings);
        }
    }

    /// Number of schedules currently held
    pub fn len(&self) -> usize {
        self.schedules.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Whether the store holds no schedules
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScheduleStore for InMemoryStore {
    fn get(&self, schedule_id: &str) -> Result<ReviewSchedule> {
        let map = self
            .schedules
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        map.get(schedule_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(schedule_id.to_string()))
    }

    fn upsert(&self, schedule: ReviewSchedule) -> Result<()> {
        let mut map = self
            .schedules
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        map.insert(schedule.schedule_id.clone(), schedule);
        Ok(())
    }

    fn schedules_for_student(&self, student_id: &str) -> Result<Vec<ReviewSchedule>> {
        let map = self
            .schedules
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let mut schedules: Vec<ReviewSchedule> = map
            .values()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; keep results stable
        schedules.sort_by(|a, b| a.schedule_id.cmp(&b.schedule_id));
        Ok(schedules)
    }

    fn student_ids(&self) -> Result<Vec<String>> {
        let map = self
            .schedules
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let mut ids: Vec<String> = map.values().map(|s| s.student_id.clone()).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

impl SettingsSource for InMemoryStore {
    fn settings_for(&self, student_id: &str) -> Result<Option<NotificationSettings>> {
        let map = self
            .settings
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(map.get(student_id).cloned())
    }
}

// ============================================================================
// TESTS
// ============================================================================
