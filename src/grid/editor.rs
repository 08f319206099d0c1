//! Editor facade wiring the grid components to a host application.
//!
//! The host owns session data. It pushes snapshots in with
//! [`GridEditor::replace_sessions`] and [`GridEditor::replace_conflicts`],
//! feeds interaction intents, and receives move/edit requests through
//! [`ScheduleHost`]. Everything observable is queued as [`GridEvent`]s.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{GridError, Result};
use crate::models::day::DayKey;
use crate::models::session::{Session, SessionId};
use crate::models::settings::GridSettings;
use crate::models::time_of_day::TimeOfDay;

use super::conflict_overlay::{ConflictFilter, ConflictOverlay, ConflictSnapshot, ConflictSummary};
use super::drag::{
    CommitOutcome, DragContext, DragEffect, DragInput, DragRepositionController, DragState,
    MoveIntent,
};
use super::events::GridEvent;
use super::history::{HistoryDirection, MoveHistory, MoveRecord};
use super::placement::{GridLayout, SessionPlacementResolver};
use super::selection::{BulkAction, SelectionManager, SelectionSet};
use super::time_grid::TimeGridModel;
use super::view_mode::{SessionAction, ViewMode, ViewModeController};

/// Refusal returned by the host for a requested change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct HostRejection {
    pub reason: String,
}

impl HostRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Application side of the grid. The grid runs on a single UI thread, so
/// futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait ScheduleHost {
    /// Move a session, returning its updated record on success
    async fn move_session(&self, intent: &MoveIntent) -> std::result::Result<Session, HostRejection>;

    async fn apply_bulk(
        &self,
        action: BulkAction,
        ids: &[SessionId],
    ) -> std::result::Result<(), HostRejection>;

    async fn edit_session(&self, session: &Session) -> std::result::Result<(), HostRejection>;

    async fn delete_session(&self, id: &SessionId) -> std::result::Result<(), HostRejection>;

    async fn duplicate_session(&self, id: &SessionId) -> std::result::Result<Session, HostRejection>;

    fn selection_changed(&self, _selection: &SelectionSet) {}
}

/// Await a host move with an upper bound; elapse is reported as
/// [`CommitOutcome::TimedOut`].
pub async fn commit_with_timeout<F>(future: F, limit: Duration) -> CommitOutcome
where
    F: Future<Output = std::result::Result<Session, HostRejection>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(Ok(session)) => CommitOutcome::Resolved(session),
        Ok(Err(rejection)) => CommitOutcome::Rejected(rejection.reason),
        Err(_) => {
            log::warn!("Host did not answer within {:?}", limit);
            CommitOutcome::TimedOut
        }
    }
}

/// Interactive grid over a host-owned schedule.
///
/// The only session data kept beyond the host's snapshot is the record the
/// host returned for each move it accepted. Those records bridge the gap
/// until the host pushes its next snapshot, and
/// [`replace_sessions`](Self::replace_sessions) discards all of them, so the
/// snapshot wins even when it disagrees.
pub struct GridEditor<H: ScheduleHost> {
    host: H,
    settings: GridSettings,
    grid: TimeGridModel,
    /// Latest host snapshot
    sessions: Vec<Session>,
    /// Host answers to accepted moves, cleared by the next snapshot
    confirmed: HashMap<SessionId, Session>,
    /// What the grid shows: snapshot + confirmations + optimistic move
    view: Vec<Session>,
    overlay: ConflictOverlay,
    selection: SelectionManager,
    mode: ViewModeController,
    drag: DragRepositionController,
    history: MoveHistory,
    events: Vec<GridEvent>,
}

impl<H: ScheduleHost> GridEditor<H> {
    pub fn new(host: H, settings: GridSettings) -> Result<Self> {
        settings.validate()?;
        let grid = settings.to_time_grid()?;
        log::debug!(
            "Grid editor ready: {} slots x {} days",
            grid.slots().len(),
            grid.days().len()
        );

        Ok(Self {
            host,
            grid,
            sessions: Vec::new(),
            confirmed: HashMap::new(),
            view: Vec::new(),
            overlay: ConflictOverlay::new(),
            selection: SelectionManager::new(),
            mode: ViewModeController::new(settings.initial_mode),
            drag: DragRepositionController::new(),
            history: MoveHistory::new(settings.history_limit),
            events: Vec::new(),
            settings,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn grid(&self) -> &TimeGridModel {
        &self.grid
    }

    /// Sessions as currently displayed
    pub fn sessions(&self) -> &[Session] {
        &self.view
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.view.iter().find(|session| &session.id == id)
    }

    pub fn mode(&self) -> ViewMode {
        self.mode.mode()
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn overlay(&self) -> &ConflictOverlay {
        &self.overlay
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- snapshots ----

    /// Replace the session snapshot wholesale.
    pub fn replace_sessions(&mut self, sessions: Vec<Session>) {
        log::debug!(
            "Replacing session snapshot ({} -> {} sessions)",
            self.sessions.len(),
            sessions.len()
        );
        self.sessions = sessions;
        self.confirmed.clear();
        let live = &self.sessions;
        self.history
            .retain(|id| live.iter().any(|session| &session.id == id));

        if let Some(effect) = self.drag.reconcile(&self.sessions) {
            self.record_effect(effect);
        }
        self.refresh_view();

        if self.selection.prune(&self.view) {
            self.selection_changed();
        }

        let rejected = self.layout().rejected;
        if !rejected.is_empty() {
            self.events.push(GridEvent::PlacementRejected(rejected));
        }
    }

    pub fn replace_conflicts(&mut self, snapshot: ConflictSnapshot) {
        let sessions = snapshot.len();
        self.overlay.replace(snapshot);
        self.events.push(GridEvent::ConflictsReplaced { sessions });
    }

    pub fn layout(&self) -> GridLayout<'_> {
        SessionPlacementResolver::new(&self.grid).layout(&self.view)
    }

    pub fn conflict_summary(&self) -> ConflictSummary {
        self.overlay.summary(&self.view)
    }

    pub fn filter_sessions(&self, filter: ConflictFilter) -> Vec<&Session> {
        self.overlay.filter(&self.view, filter)
    }

    // ---- selection ----

    pub fn select(&mut self, id: SessionId) -> Result<()> {
        self.require_session(&id)?;
        if self.selection.select(id) {
            self.selection_changed();
        }
        Ok(())
    }

    pub fn toggle_selection(&mut self, id: SessionId) -> Result<()> {
        self.require_session(&id)?;
        self.selection.toggle_additive(id);
        self.selection_changed();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.selection_changed();
        }
    }

    /// Apply `action` to every selected session. The selection is kept if
    /// the host refuses.
    pub async fn run_bulk(&mut self, action: BulkAction) -> Result<usize> {
        let ids = self.selection.sorted_ids();
        if ids.is_empty() {
            return Err(GridError::EmptySelection);
        }

        let outcome = self.host.apply_bulk(action, &ids).await;
        let count = self.selection.run_bulk(action, |action, ids| {
            outcome
                .map(|_| ids.len())
                .map_err(|rejection| GridError::BulkFailed {
                    action: action.label(),
                    reason: rejection.reason,
                })
        })?;
        self.selection_changed();
        Ok(count)
    }

    // ---- modes ----

    pub fn switch_mode(&mut self, mode: ViewMode) {
        let Some(change) = self.mode.switch_to(mode) else {
            return;
        };
        if change.cancels_drag {
            if let Some(effect) = self.drag.force_cancel() {
                self.record_effect(effect);
            }
        }
        self.events.push(GridEvent::ModeChanged(change));
    }

    // ---- drag ----

    pub fn pointer_down(&mut self, id: SessionId) {
        self.feed(DragInput::PointerDown(id));
    }

    pub fn hover(&mut self, day: DayKey, time: TimeOfDay) {
        self.feed(DragInput::Hover { day, time });
    }

    /// Drop on the hovered cell. Returns the move to send to the host, if
    /// any; answer it with [`GridEditor::complete_commit`].
    pub fn drop_on_cell(&mut self) -> Option<MoveIntent> {
        match self.feed(DragInput::Drop) {
            Some(DragEffect::MoveRequested(intent)) => Some(intent),
            _ => None,
        }
    }

    pub fn drop_outside(&mut self) {
        self.feed(DragInput::DropOutside);
    }

    pub fn cancel_drag(&mut self) {
        self.feed(DragInput::Cancel);
    }

    /// Settle a pending move. Returns the committed session, or the error
    /// the move was reverted with.
    pub fn complete_commit(&mut self, outcome: CommitOutcome) -> Result<Option<Session>> {
        match self.feed(DragInput::Outcome(outcome)) {
            Some(DragEffect::Committed { session, .. }) => Ok(Some(session)),
            Some(DragEffect::Reverted { error, .. }) => Err(error),
            _ => Ok(None),
        }
    }

    /// Drop and await the host, bounded by the configured commit timeout.
    /// `Ok(None)` when the drop did not produce a move.
    pub async fn drop_and_commit(&mut self) -> Result<Option<Session>> {
        let intent = match self.feed(DragInput::Drop) {
            Some(DragEffect::MoveRequested(intent)) => intent,
            Some(DragEffect::Reverted { error, .. }) => return Err(error),
            _ => return Ok(None),
        };

        let outcome =
            commit_with_timeout(self.host.move_session(&intent), self.settings.commit_timeout())
                .await;
        self.complete_commit(outcome)
    }

    // ---- per-session actions ----

    pub async fn edit_session(&mut self, id: &SessionId) -> Result<()> {
        let session = self.checked_session(SessionAction::Edit, id)?;
        self.host
            .edit_session(&session)
            .await
            .map_err(|rejection| action_failed(SessionAction::Edit, id, rejection))
    }

    pub async fn delete_session(&mut self, id: &SessionId) -> Result<()> {
        self.checked_session(SessionAction::Delete, id)?;
        self.host
            .delete_session(id)
            .await
            .map_err(|rejection| action_failed(SessionAction::Delete, id, rejection))?;
        self.history.forget(id);
        log::info!("Session {} deleted", id);
        Ok(())
    }

    pub async fn duplicate_session(&mut self, id: &SessionId) -> Result<Session> {
        self.checked_session(SessionAction::Duplicate, id)?;
        self.host
            .duplicate_session(id)
            .await
            .map_err(|rejection| action_failed(SessionAction::Duplicate, id, rejection))
    }

    // ---- history ----

    pub async fn undo(&mut self) -> Result<Option<MoveRecord>> {
        self.step_history(HistoryDirection::Undo).await
    }

    pub async fn redo(&mut self) -> Result<Option<MoveRecord>> {
        self.step_history(HistoryDirection::Redo).await
    }

    async fn step_history(&mut self, direction: HistoryDirection) -> Result<Option<MoveRecord>> {
        if let Some(pending) = self.drag.pending() {
            return Err(GridError::CommitInProgress(pending.intent.session_id.clone()));
        }
        if !self.mode.drag_enabled() {
            return Err(GridError::ActionUnavailable {
                action: direction.label(),
                mode: self.mode.mode(),
            });
        }
        let Some(record) = self.history.peek(direction).cloned() else {
            return Ok(None);
        };
        if self.require_session(&record.session_id)?.is_locked {
            return Err(GridError::LockedSession(record.session_id));
        }
        if let Some(effect) = self.drag.force_cancel() {
            self.record_effect(effect);
        }

        let intent = match direction {
            HistoryDirection::Undo => record.undo_intent(),
            HistoryDirection::Redo => record.redo_intent(),
        };
        let outcome =
            commit_with_timeout(self.host.move_session(&intent), self.settings.commit_timeout())
                .await;

        match outcome {
            CommitOutcome::Resolved(session) => {
                self.history.complete(direction);
                self.confirmed.insert(session.id.clone(), session);
                self.refresh_view();
                log::info!("{}: {}", direction.label(), record.description());
                self.events.push(GridEvent::HistoryApplied {
                    direction,
                    record: record.clone(),
                });
                Ok(Some(record))
            }
            CommitOutcome::Rejected(reason) => Err(GridError::MoveRejected {
                id: intent.session_id,
                reason,
            }),
            CommitOutcome::TimedOut => Err(GridError::CommitTimeout(intent.session_id)),
        }
    }

    // ---- internals ----

    fn feed(&mut self, input: DragInput) -> Option<DragEffect> {
        let ctx = DragContext {
            grid: &self.grid,
            sessions: &self.view,
            enabled: self.mode.drag_enabled(),
        };
        let effect = self.drag.apply(input, &ctx)?;
        self.record_effect(effect.clone());
        Some(effect)
    }

    fn record_effect(&mut self, effect: DragEffect) {
        let event = match effect {
            DragEffect::Started(origin) => GridEvent::DragStarted(origin),
            DragEffect::HoverChanged {
                session_id,
                day,
                time,
            } => GridEvent::HoverChanged {
                session_id,
                day,
                time,
            },
            DragEffect::HoverLeft(id) => GridEvent::HoverLeft(id),
            DragEffect::MoveRequested(intent) => {
                log::info!(
                    "Requesting move of {} to {} {}",
                    intent.session_id,
                    intent.day,
                    intent.start
                );
                GridEvent::MoveRequested(intent)
            }
            DragEffect::Committed { session, origin } => {
                self.history.push(MoveRecord {
                    session_id: session.id.clone(),
                    from_day: origin.day,
                    from_start: origin.start,
                    to_day: session.day,
                    to_start: session.start,
                });
                self.confirmed.insert(session.id.clone(), session.clone());
                log::info!("Move of {} committed", session.id);
                GridEvent::MoveCommitted(session)
            }
            DragEffect::Reverted { origin, error } => {
                if error.is_commit_failure() {
                    log::warn!("Move of {} reverted: {}", origin.session_id, error);
                } else {
                    log::info!("Drop of {} not applied: {}", origin.session_id, error);
                }
                GridEvent::MoveReverted { origin, error }
            }
            DragEffect::Cancelled(id) => GridEvent::DragCancelled(id),
            DragEffect::Refused(error) => {
                log::debug!("Drag refused: {}", error);
                GridEvent::DragRefused(error)
            }
        };
        self.events.push(event);
        self.refresh_view();
    }

    /// Rebuild the displayed list. A pending move shows at its candidate
    /// cell until the host answers.
    fn refresh_view(&mut self) {
        let pending = self.drag.pending();
        let confirmed = &self.confirmed;

        self.view = self
            .sessions
            .iter()
            .map(|session| {
                let base = confirmed.get(&session.id).unwrap_or(session);
                match pending.filter(|pending| pending.intent.session_id == session.id) {
                    Some(pending) => Session {
                        day: pending.intent.day,
                        start: pending.intent.start,
                        end: pending.end,
                        ..base.clone()
                    },
                    None => base.clone(),
                }
            })
            .collect();
    }

    fn selection_changed(&mut self) {
        self.host.selection_changed(self.selection.ids());
        self.events
            .push(GridEvent::SelectionChanged(self.selection.sorted_ids()));
    }

    fn require_session(&self, id: &SessionId) -> Result<&Session> {
        self.session(id)
            .ok_or_else(|| GridError::UnknownSession(id.clone()))
    }

    fn checked_session(&self, action: SessionAction, id: &SessionId) -> Result<Session> {
        let session = self.require_session(id)?;
        self.mode.check_action(action, session)?;
        Ok(session.clone())
    }
}

fn action_failed(action: SessionAction, id: &SessionId, rejection: HostRejection) -> GridError {
    GridError::ActionFailed {
        action: action.label(),
        id: id.clone(),
        reason: rejection.reason,
    }
}
