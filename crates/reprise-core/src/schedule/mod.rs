//! Schedule Module
//!
//! Per-(learner, item) review state and the feedback-driven calculator:
//! - `ReviewSchedule` record with interval/ease scheduling state
//! - `ReviewFeedback` input with the four-grade quality scale
//! - `ScheduleCalculator` state machine that applies feedback

mod calculator;
mod record;

pub use calculator::{Result, ScheduleCalculator, ScheduleError, SchedulerConfig};
pub use record::{
    days_to_duration, DifficultyLevel, Quality, ReviewFeedback, ReviewSchedule, EASE_FLOOR,
};
