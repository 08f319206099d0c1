//! Session placement on the time grid.
//!
//! Maps each session to its anchor row and the number of rows its card
//! covers, and builds the per-day layout used by renderers. Sessions that
//! cannot be placed are reported in [`GridLayout::rejected`] instead of
//! failing the whole layout.

use std::collections::HashSet;

use crate::error::{GridError, Result};
use crate::models::day::DayKey;
use crate::models::session::{Session, SessionId};
use crate::models::time_of_day::TimeOfDay;
use crate::utils::time::ceil_div;

use super::time_grid::TimeGridModel;

/// Where a session's card is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub session_id: &'a SessionId,
    pub day: DayKey,
    /// Row the card is anchored to
    pub anchor_slot: usize,
    /// Rows needed to cover the full duration
    pub span: u32,
    /// Rows actually available below the anchor
    pub visible_span: u32,
}

/// A session left out of the layout, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementIssue {
    pub session_id: SessionId,
    pub error: GridError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn<'a> {
    pub day: DayKey,
    /// Sorted by anchor row, then id
    pub placements: Vec<Placement<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridLayout<'a> {
    pub columns: Vec<DayColumn<'a>>,
    pub rejected: Vec<PlacementIssue>,
}

impl<'a> GridLayout<'a> {
    pub fn column(&self, day: DayKey) -> Option<&DayColumn<'a>> {
        self.columns.iter().find(|column| column.day == day)
    }

    pub fn placement(&self, id: &SessionId) -> Option<&Placement<'a>> {
        self.columns
            .iter()
            .flat_map(|column| column.placements.iter())
            .find(|placement| placement.session_id == id)
    }

    /// Number of placed sessions
    pub fn placed_count(&self) -> usize {
        self.columns.iter().map(|column| column.placements.len()).sum()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionPlacementResolver<'g> {
    grid: &'g TimeGridModel,
}

impl<'g> SessionPlacementResolver<'g> {
    pub fn new(grid: &'g TimeGridModel) -> Self {
        Self { grid }
    }

    pub fn anchor_slot(&self, session: &Session) -> Result<usize> {
        self.grid.slot_index_of(session.start)
    }

    /// `ceil(duration / granularity)`
    pub fn span(&self, session: &Session) -> u32 {
        ceil_div(session.duration_minutes(), self.grid.granularity())
    }

    /// Whether the session covers any part of the slot starting at
    /// `slot_time`. Intervals are half-open, so a session ending exactly on
    /// the slot start does not occupy it.
    pub fn occupies_slot(&self, session: &Session, day: DayKey, slot_time: TimeOfDay) -> bool {
        if session.day != day {
            return false;
        }
        let slot_start = slot_time.minutes();
        let slot_end = slot_start + self.grid.granularity();
        session.start.minutes() < slot_end && session.end.minutes() > slot_start
    }

    pub fn place<'s>(&self, session: &'s Session) -> Result<Placement<'s>> {
        session.validate()?;
        self.grid.check_day(session.day)?;

        let anchor_slot = self.anchor_slot(session)?;
        let span = self.span(session);
        let rows_left = (self.grid.slots().len() - anchor_slot) as u32;

        Ok(Placement {
            session_id: &session.id,
            day: session.day,
            anchor_slot,
            span,
            visible_span: span.min(rows_left),
        })
    }

    /// Lay out a full snapshot. Never fails: sessions that cannot be placed
    /// (malformed, off-axis, outside the window, duplicate id) are reported.
    pub fn layout<'s>(&self, sessions: &'s [Session]) -> GridLayout<'s> {
        let mut columns: Vec<DayColumn<'s>> = self
            .grid
            .days()
            .days()
            .iter()
            .map(|day| DayColumn {
                day: *day,
                placements: Vec::new(),
            })
            .collect();
        let mut rejected = Vec::new();
        let mut seen: HashSet<&SessionId> = HashSet::new();

        for session in sessions {
            if !seen.insert(&session.id) {
                log::warn!("Duplicate session id {} in snapshot, skipping", session.id);
                rejected.push(PlacementIssue {
                    session_id: session.id.clone(),
                    error: GridError::malformed(&session.id, "duplicate session id"),
                });
                continue;
            }

            match self.place(session) {
                Ok(placement) => {
                    if let Some(column) = columns.iter_mut().find(|c| c.day == placement.day) {
                        column.placements.push(placement);
                    }
                }
                Err(error) => {
                    log::warn!("Session {} not placed: {}", session.id, error);
                    rejected.push(PlacementIssue {
                        session_id: session.id.clone(),
                        error,
                    });
                }
            }
        }

        for column in &mut columns {
            column
                .placements
                .sort_by(|a, b| (a.anchor_slot, a.session_id).cmp(&(b.anchor_slot, b.session_id)));
        }

        GridLayout { columns, rejected }
    }

    /// Ids of sessions covering the cell at (`day`, `slot_index`), for
    /// drop-target highlighting and hit-testing.
    pub fn sessions_at<'s>(
        &self,
        sessions: &'s [Session],
        day: DayKey,
        slot_index: usize,
    ) -> Vec<&'s SessionId> {
        let Some(slot) = self.grid.slot(slot_index) else {
            return Vec::new();
        };

        sessions
            .iter()
            .filter(|session| session.validate().is_ok())
            .filter(|session| self.occupies_slot(session, day, slot.time))
            .map(|session| &session.id)
            .collect()
    }
}
