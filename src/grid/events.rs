//! Notifications the editor queues for its host.
//!
//! The host drains them after each interaction and decides how to present
//! them; [`GridEvent::feedback`] gives a suggested level and message for a
//! transient status line.

use crate::error::GridError;
use crate::models::day::DayKey;
use crate::models::session::{Session, SessionId};
use crate::models::time_of_day::TimeOfDay;

use super::drag::{DragOrigin, MoveIntent};
use super::history::{HistoryDirection, MoveRecord};
use super::placement::PlacementIssue;
use super::view_mode::ModeChange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    DragStarted(DragOrigin),
    HoverChanged {
        session_id: SessionId,
        day: DayKey,
        time: TimeOfDay,
    },
    /// Pointer left the grid mid-drag; no cell is targeted
    HoverLeft(SessionId),
    MoveRequested(MoveIntent),
    MoveCommitted(Session),
    /// Move abandoned after drop; the card is back at its origin
    MoveReverted {
        origin: DragOrigin,
        error: GridError,
    },
    DragCancelled(SessionId),
    DragRefused(GridError),
    SelectionChanged(Vec<SessionId>),
    ModeChanged(ModeChange),
    PlacementRejected(Vec<PlacementIssue>),
    ConflictsReplaced { sessions: usize },
    HistoryApplied {
        direction: HistoryDirection,
        record: MoveRecord,
    },
}

/// Suggested presentation level for a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeedbackLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl FeedbackLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            FeedbackLevel::Success => "✓",
            FeedbackLevel::Info => "ℹ",
            FeedbackLevel::Warning => "⚠",
            FeedbackLevel::Error => "✗",
        }
    }
}

impl GridEvent {
    /// Status-line message for events worth surfacing. Hover and selection
    /// chatter returns `None`.
    pub fn feedback(&self) -> Option<(FeedbackLevel, String)> {
        match self {
            GridEvent::MoveCommitted(session) => Some((
                FeedbackLevel::Success,
                format!(
                    "Moved {} to {} {}",
                    session.id,
                    session.day.label(),
                    session.start
                ),
            )),
            GridEvent::MoveReverted { error, .. } => {
                let level = if matches!(error, GridError::OutOfRange { .. }) {
                    FeedbackLevel::Warning
                } else {
                    FeedbackLevel::Error
                };
                Some((level, error.to_string()))
            }
            GridEvent::DragRefused(error) => Some((FeedbackLevel::Warning, error.to_string())),
            GridEvent::PlacementRejected(issues) if !issues.is_empty() => Some((
                FeedbackLevel::Warning,
                format!("{} session(s) could not be placed", issues.len()),
            )),
            GridEvent::HistoryApplied { direction, record } => Some((
                FeedbackLevel::Info,
                format!("{}: {}", direction.label(), record.description()),
            )),
            _ => None,
        }
    }
}
