//! Notification Module
//!
//! Decides whether and when an overdue/reminder event should be raised for
//! a learner, independent of the delivery transport:
//! - `NotificationSettings` with load-time validation
//! - `QuietHoursGate` do-not-disturb window check
//! - `NotificationScheduler` per-learner tick with anti-spam sent log

mod quiet;
mod scheduler;
mod settings;

pub use quiet::is_quiet;
pub use scheduler::{
    NotificationEvent, NotificationKind, NotificationScheduler, NotifyError, Result,
};
pub use settings::{NotificationSettings, QuietHours, SettingsError, MAX_THRESHOLD_MINUTES};
