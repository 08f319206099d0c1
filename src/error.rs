//! Error taxonomy for the scheduling grid.
//!
//! Placement errors are collected and reported as data-quality signals,
//! drag errors revert the controller to idle and surface as grid events.
//! Neither is ever thrown through the layout path.

use thiserror::Error;

use crate::grid::view_mode::ViewMode;
use crate::models::day::DayKey;
use crate::models::session::SessionId;
use crate::models::time_of_day::TimeOfDay;
use crate::utils::time::format_minutes;

/// Result alias used across the grid modules.
pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("{time} is outside the grid window {first}-{last}")]
    OutOfRange {
        time: String,
        first: TimeOfDay,
        last: TimeOfDay,
    },
    #[error("{0} is not on the grid's day axis")]
    DayOutOfRange(DayKey),
    #[error("session `{0}` is locked")]
    LockedSession(SessionId),
    #[error("move of session `{id}` rejected: {reason}")]
    MoveRejected { id: SessionId, reason: String },
    #[error("move of session `{0}` timed out")]
    CommitTimeout(SessionId),
    #[error("malformed session `{id}`: {reason}")]
    MalformedSession { id: SessionId, reason: String },
    #[error("invalid time `{0}` (expected HH:MM)")]
    InvalidTime(String),
    #[error("invalid grid configuration: {0}")]
    InvalidGrid(String),
    #[error("session `{0}` not found")]
    UnknownSession(SessionId),
    #[error("no sessions selected")]
    EmptySelection,
    #[error("a move is already being committed for session `{0}`")]
    CommitInProgress(SessionId),
    #[error("{action} is not available in {mode} mode")]
    ActionUnavailable { action: &'static str, mode: ViewMode },
    #[error("{action} of session `{id}` failed: {reason}")]
    ActionFailed {
        action: &'static str,
        id: SessionId,
        reason: String,
    },
    #[error("bulk {action} failed: {reason}")]
    BulkFailed { action: &'static str, reason: String },
}

impl GridError {
    /// Build an `OutOfRange` error for a minute offset that may not be a
    /// representable time of day (e.g. a candidate end past midnight).
    pub fn out_of_range(minutes: u32, first: TimeOfDay, last: TimeOfDay) -> Self {
        GridError::OutOfRange {
            time: format_minutes(minutes),
            first,
            last,
        }
    }

    pub fn malformed(id: &SessionId, reason: impl Into<String>) -> Self {
        GridError::MalformedSession {
            id: id.clone(),
            reason: reason.into(),
        }
    }

    /// True for the commit outcomes that roll an optimistic placement back.
    pub fn is_commit_failure(&self) -> bool {
        matches!(
            self,
            GridError::MoveRejected { .. } | GridError::CommitTimeout(_)
        )
    }
}
