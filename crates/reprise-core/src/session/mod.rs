//! Review Session
//!
//! Explicit finite-state machine for one item moving through a review:
//! show the prompt, reveal the answer, collect a feedback grade. The
//! original flow lived in UI state transitions; here it is a plain state
//! machine with no rendering concerns, so the request path and tests drive
//! it directly.
//!
//! ```text
//! AwaitingReveal --reveal()--> AwaitingFeedback --submit(quality)--> Submitted
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::Quality;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors from out-of-order session transitions
#[derive(Debug, Error)]
pub enum SessionError {
    /// `submit` before `reveal`, a double `reveal`, or any action after
    /// the grade was recorded
    #[error("Invalid transition: {action} while {state}")]
    InvalidTransition {
        /// Attempted action
        action: &'static str,
        /// State the session was in
        state: SessionState,
    },
}

// ============================================================================
// STATES
// ============================================================================

/// Where one item's review currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    /// Prompt shown, answer hidden
    #[default]
    AwaitingReveal,
    /// Answer revealed, waiting for a grade
    AwaitingFeedback,
    /// Grade recorded; the session is finished
    Submitted,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::AwaitingReveal => "awaiting reveal",
            SessionState::AwaitingFeedback => "awaiting feedback",
            SessionState::Submitted => "submitted",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// One item's pass through a review session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    /// Schedule under review
    pub schedule_id: String,
    /// Current machine state
    pub state: SessionState,
    /// When the prompt was first shown
    pub started_at: DateTime<Utc>,
    /// When the answer was revealed
    pub revealed_at: Option<DateTime<Utc>>,
    /// The grade, once submitted
    pub quality: Option<Quality>,
}

impl ReviewSession {
    /// Start a session with the prompt shown and the answer hidden
    pub fn begin(schedule_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            schedule_id: schedule_id.into(),
            state: SessionState::AwaitingReveal,
            started_at: now,
            revealed_at: None,
            quality: None,
        }
    }

    /// Reveal the answer
    pub fn reveal(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        match self.state {
            SessionState::AwaitingReveal => {
                self.state = SessionState::AwaitingFeedback;
                self.revealed_at = Some(now);
                Ok(())
            }
            state => Err(SessionError::InvalidTransition {
                action: "reveal",
                state,
            }),
        }
    }

    /// Record the learner's grade
    pub fn submit(&mut self, quality: Quality) -> Result<(), SessionError> {
        match self.state {
            SessionState::AwaitingFeedback => {
                self.state = SessionState::Submitted;
                self.quality = Some(quality);
                Ok(())
            }
            state => Err(SessionError::InvalidTransition {
                action: "submit",
                state,
            }),
        }
    }

    /// Seconds between reveal and the start of the session, if revealed.
    /// Feeds `ReviewFeedback::response_time_seconds`.
    pub fn response_time_seconds(&self) -> Option<f64> {
        self.revealed_at
            .map(|revealed| (revealed - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

// ============================================================================
// TESTS
// ============================================================================
