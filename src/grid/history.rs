// Move History
//
// Undo/redo stacks for committed drag moves. The grid never owns session
// data, so undoing a move means asking the host to move the session back;
// a record only changes stacks once the host has accepted that request.

use crate::models::day::DayKey;
use crate::models::session::SessionId;
use crate::models::time_of_day::TimeOfDay;

use super::drag::MoveIntent;

const DEFAULT_MAX_HISTORY: usize = 50;

/// A move the host accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub session_id: SessionId,
    pub from_day: DayKey,
    pub from_start: TimeOfDay,
    pub to_day: DayKey,
    pub to_start: TimeOfDay,
}

impl MoveRecord {
    pub fn description(&self) -> String {
        format!(
            "Move session \"{}\" from {} {} to {} {}",
            self.session_id,
            self.from_day.short_label(),
            self.from_start,
            self.to_day.short_label(),
            self.to_start
        )
    }

    /// Request that puts the session back where it came from
    pub fn undo_intent(&self) -> MoveIntent {
        MoveIntent {
            session_id: self.session_id.clone(),
            day: self.from_day,
            start: self.from_start,
        }
    }

    pub fn redo_intent(&self) -> MoveIntent {
        MoveIntent {
            session_id: self.session_id.clone(),
            day: self.to_day,
            start: self.to_start,
        }
    }
}

/// Which stack a history step reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl HistoryDirection {
    pub fn label(&self) -> &'static str {
        match self {
            HistoryDirection::Undo => "undo",
            HistoryDirection::Redo => "redo",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoveHistory {
    undo_stack: Vec<MoveRecord>,
    redo_stack: Vec<MoveRecord>,
    max_history: usize,
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl MoveHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    /// Record a committed move. Clears the redo stack.
    pub fn push(&mut self, record: MoveRecord) {
        self.redo_stack.clear();
        self.undo_stack.push(record);

        while self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    /// Next record `direction` would apply
    pub fn peek(&self, direction: HistoryDirection) -> Option<&MoveRecord> {
        match direction {
            HistoryDirection::Undo => self.undo_stack.last(),
            HistoryDirection::Redo => self.redo_stack.last(),
        }
    }

    /// Move the top record across once the host accepted it
    pub fn complete(&mut self, direction: HistoryDirection) -> Option<MoveRecord> {
        let (from, to) = match direction {
            HistoryDirection::Undo => (&mut self.undo_stack, &mut self.redo_stack),
            HistoryDirection::Redo => (&mut self.redo_stack, &mut self.undo_stack),
        };
        let record = from.pop()?;
        to.push(record.clone());
        Some(record)
    }

    /// Drop every record about `id`, e.g. after the session was deleted
    pub fn forget(&mut self, id: &SessionId) {
        self.retain(|other| other != id);
    }

    /// Keep only records whose session passes `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&SessionId) -> bool) {
        self.undo_stack.retain(|record| keep(&record.session_id));
        self.redo_stack.retain(|record| keep(&record.session_id));
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(MoveRecord::description)
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(MoveRecord::description)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
