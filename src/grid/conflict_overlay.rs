//! Conflict overlay.
//!
//! Conflicts are advisory: they change how a card is marked, never whether
//! it can be rendered, selected or dragged. The side list supplied by the
//! detection service is always swapped in whole.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::conflict::{Conflict, ConflictKind, Severity};
use crate::models::session::{Session, SessionId};

/// Conflicts keyed by session id, as pushed by the detection service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictSnapshot {
    entries: HashMap<SessionId, Vec<Conflict>>,
}

impl ConflictSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<SessionId>, conflicts: Vec<Conflict>) -> Self {
        self.entries.entry(id.into()).or_default().extend(conflicts);
        self
    }

    pub fn get(&self, id: &SessionId) -> &[Conflict] {
        self.entries.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn session_ids(&self) -> impl Iterator<Item = &SessionId> {
        self.entries.keys()
    }

    /// Number of sessions with an entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}

impl FromIterator<(SessionId, Vec<Conflict>)> for ConflictSnapshot {
    fn from_iter<T: IntoIterator<Item = (SessionId, Vec<Conflict>)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |snapshot, (id, conflicts)| snapshot.with(id, conflicts))
    }
}

/// Highest severity among `conflicts`, or `None` when there are none.
pub fn display_severity<'a>(conflicts: impl IntoIterator<Item = &'a Conflict>) -> Option<Severity> {
    conflicts.into_iter().map(|conflict| conflict.severity).max()
}

/// Which sessions to show when filtering by conflict state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictFilter {
    #[default]
    All,
    WithConflicts,
    WithoutConflicts,
    AtLeast(Severity),
}

impl ConflictFilter {
    pub fn matches(&self, severity: Option<Severity>) -> bool {
        match self {
            ConflictFilter::All => true,
            ConflictFilter::WithConflicts => severity.is_some(),
            ConflictFilter::WithoutConflicts => severity.is_none(),
            ConflictFilter::AtLeast(min) => severity.is_some_and(|s| s >= *min),
        }
    }
}

/// Conflict roll-up over a session snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConflictSummary {
    pub total: usize,
    pub sessions_affected: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_kind: BTreeMap<ConflictKind, usize>,
    pub highest: Option<Severity>,
}

#[derive(Debug, Clone, Default)]
pub struct ConflictOverlay {
    side: ConflictSnapshot,
}

impl ConflictOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new side list. Previous entries never survive a replace.
    pub fn replace(&mut self, snapshot: ConflictSnapshot) {
        log::debug!(
            "Replacing conflict snapshot ({} -> {} sessions)",
            self.side.len(),
            snapshot.len()
        );
        self.side = snapshot;
    }

    pub fn snapshot(&self) -> &ConflictSnapshot {
        &self.side
    }

    /// Embedded conflicts followed by side-list conflicts for `session`
    pub fn conflicts_for<'a>(&'a self, session: &'a Session) -> impl Iterator<Item = &'a Conflict> {
        session.conflicts.iter().chain(self.side.get(&session.id))
    }

    pub fn display_severity(&self, session: &Session) -> Option<Severity> {
        display_severity(self.conflicts_for(session))
    }

    pub fn has_conflicts(&self, session: &Session) -> bool {
        self.conflicts_for(session).next().is_some()
    }

    pub fn filter<'s>(&self, sessions: &'s [Session], filter: ConflictFilter) -> Vec<&'s Session> {
        sessions
            .iter()
            .filter(|session| filter.matches(self.display_severity(session)))
            .collect()
    }

    /// Roll up conflicts for the sessions in `sessions`. Side-list entries
    /// for ids not in the snapshot are ignored.
    pub fn summary(&self, sessions: &[Session]) -> ConflictSummary {
        let mut summary = ConflictSummary::default();
        let mut affected: HashSet<&SessionId> = HashSet::new();

        for session in sessions {
            for conflict in self.conflicts_for(session) {
                summary.total += 1;
                *summary.by_severity.entry(conflict.severity).or_default() += 1;
                *summary.by_kind.entry(conflict.kind).or_default() += 1;
                affected.insert(&session.id);
            }
        }

        summary.sessions_affected = affected.len();
        summary.highest = summary.by_severity.keys().next_back().copied();
        summary
    }
}
