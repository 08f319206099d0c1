//! Session selection: single select and additive (modifier-click) toggle.
//! There is no range selection.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::models::session::{Session, SessionId};

pub type SelectionSet = HashSet<SessionId>;

/// Actions that apply to every selected session at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Delete,
    Duplicate,
    Cancel,
    Reschedule,
    Notify,
}

impl BulkAction {
    pub fn label(&self) -> &'static str {
        match self {
            BulkAction::Delete => "delete",
            BulkAction::Duplicate => "duplicate",
            BulkAction::Cancel => "cancel",
            BulkAction::Reschedule => "reschedule",
            BulkAction::Notify => "notify",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: SelectionSet,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `{id}`. Returns true if it changed.
    pub fn select(&mut self, id: SessionId) -> bool {
        if self.selected.len() == 1 && self.selected.contains(&id) {
            return false;
        }
        self.selected.clear();
        self.selected.insert(id);
        true
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle_additive(&mut self, id: SessionId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Drop ids no longer present in `sessions`. Returns true if any were removed.
    pub fn prune(&mut self, sessions: &[Session]) -> bool {
        let live: HashSet<&SessionId> = sessions.iter().map(|session| &session.id).collect();
        let before = self.selected.len();
        self.selected.retain(|id| live.contains(id));
        let removed = before - self.selected.len();
        if removed > 0 {
            log::debug!("Pruned {} stale id(s) from selection", removed);
        }
        removed > 0
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.selected.contains(id)
    }

    pub fn ids(&self) -> &SelectionSet {
        &self.selected
    }

    /// Selected ids in a stable order
    pub fn sorted_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Run a bulk action over the current selection.
    ///
    /// The selection is cleared only when `apply` succeeds; on failure it is
    /// left intact so the operator can retry.
    pub fn run_bulk<T, E, F>(&mut self, action: BulkAction, apply: F) -> Result<T, E>
    where
        E: From<GridError>,
        F: FnOnce(BulkAction, &[SessionId]) -> Result<T, E>,
    {
        if self.selected.is_empty() {
            return Err(GridError::EmptySelection.into());
        }

        let ids = self.sorted_ids();
        let value = apply(action, &ids)?;
        log::info!("Bulk {} applied to {} session(s)", action, ids.len());
        self.selected.clear();
        Ok(value)
    }
}
