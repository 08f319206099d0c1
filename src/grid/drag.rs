//! Drag-to-reschedule state machine.
//!
//! Pointer activity is reduced to discrete [`DragInput`]s at the boundary and
//! fed through [`transition`], a pure function over [`DragState`]. Only one
//! drag exists in the whole grid, and a new one cannot start while a move
//! is waiting on the host.
//!
//! ```text
//! Idle --pointer down--> Dragging --hover--> HoverSlot --drop--> Committing
//!  ^                        |  <--leave grid---  |                   |
//!  ^                        |                    |                   |
//!  +------cancel / drop outside-----------------+                   |
//!  +-------------------- resolved / rejected / timed out ------------+
//! ```

use crate::error::GridError;
use crate::models::day::DayKey;
use crate::models::session::{Session, SessionId};
use crate::models::time_of_day::TimeOfDay;

use super::time_grid::TimeGridModel;

/// Request sent to the host to move a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub session_id: SessionId,
    pub day: DayKey,
    pub start: TimeOfDay,
}

/// Where the session was picked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOrigin {
    pub session_id: SessionId,
    pub day: DayKey,
    pub start: TimeOfDay,
    /// Preserved across the move; a drag never resizes
    pub duration: u32,
}

/// A move waiting on the host, shown optimistically at its candidate cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub intent: MoveIntent,
    pub end: TimeOfDay,
    pub origin: DragOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        origin: DragOrigin,
    },
    HoverSlot {
        origin: DragOrigin,
        day: DayKey,
        time: TimeOfDay,
    },
    Committing {
        pending: PendingMove,
    },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    /// Pointer is down on a session (Dragging or HoverSlot)
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. } | DragState::HoverSlot { .. })
    }

    pub fn is_committing(&self) -> bool {
        matches!(self, DragState::Committing { .. })
    }

    /// Session this state refers to, if any
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { origin } | DragState::HoverSlot { origin, .. } => {
                Some(&origin.session_id)
            }
            DragState::Committing { pending } => Some(&pending.intent.session_id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::Dragging { .. } => "dragging",
            DragState::HoverSlot { .. } => "hover",
            DragState::Committing { .. } => "committing",
        }
    }
}

/// How the host answered a move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Resolved(Session),
    Rejected(String),
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragInput {
    PointerDown(SessionId),
    /// Pointer over the cell at (`day`, `time`); `time` is snapped to its slot
    Hover { day: DayKey, time: TimeOfDay },
    Drop,
    DropOutside,
    Cancel,
    Outcome(CommitOutcome),
}

/// Observable result of a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    Started(DragOrigin),
    HoverChanged {
        session_id: SessionId,
        day: DayKey,
        time: TimeOfDay,
    },
    /// Pointer left the grid; the highlighted cell is gone
    HoverLeft(SessionId),
    MoveRequested(MoveIntent),
    Committed {
        session: Session,
        origin: DragOrigin,
    },
    /// Move abandoned after drop; the card goes back to its origin
    Reverted {
        origin: DragOrigin,
        error: GridError,
    },
    Cancelled(SessionId),
    /// Pointer-down that could not start a drag; state is unchanged
    Refused(GridError),
}

/// What the transition function needs to know about the grid
#[derive(Debug, Clone, Copy)]
pub struct DragContext<'a> {
    pub grid: &'a TimeGridModel,
    pub sessions: &'a [Session],
    /// Drag affordance active in the current view mode
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: DragState,
    pub effect: Option<DragEffect>,
}

impl Transition {
    fn to(state: DragState, effect: DragEffect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }

    fn stay(state: DragState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

/// Pure transition function for the drag lifecycle.
pub fn transition(state: DragState, input: DragInput, ctx: &DragContext<'_>) -> Transition {
    match (state, input) {
        (DragState::Idle, DragInput::PointerDown(id)) => start_drag(id, ctx),

        (DragState::Dragging { origin }, DragInput::Hover { day, time })
            if ctx.grid.check_day(day).is_ok() && ctx.grid.contains(time) =>
        {
            hover(origin, None, day, time, ctx)
        }

        (
            DragState::HoverSlot {
                origin,
                day: current_day,
                time: current_time,
            },
            DragInput::Hover { day, time },
        ) if ctx.grid.check_day(day).is_ok() && ctx.grid.contains(time) => {
            hover(origin, Some((current_day, current_time)), day, time, ctx)
        }

        (DragState::HoverSlot { origin, .. }, DragInput::Hover { .. }) => {
            let effect = DragEffect::HoverLeft(origin.session_id.clone());
            Transition::to(DragState::Dragging { origin }, effect)
        }

        (DragState::HoverSlot { origin, day, time }, DragInput::Drop) => {
            drop_on_cell(origin, day, time, ctx)
        }

        (DragState::Dragging { origin }, DragInput::Drop | DragInput::DropOutside | DragInput::Cancel)
        | (
            DragState::HoverSlot { origin, .. },
            DragInput::DropOutside | DragInput::Cancel,
        ) => Transition::to(DragState::Idle, DragEffect::Cancelled(origin.session_id)),

        (DragState::Committing { pending }, DragInput::Outcome(outcome)) => {
            settle(pending, outcome)
        }

        // Pointer-down while a drag or commit is in flight is ignored, as
        // are outcomes with nothing pending.
        (state, _) => Transition::stay(state),
    }
}

fn start_drag(id: SessionId, ctx: &DragContext<'_>) -> Transition {
    if !ctx.enabled {
        return Transition::stay(DragState::Idle);
    }

    let Some(session) = ctx.sessions.iter().find(|session| session.id == id) else {
        return Transition::to(DragState::Idle, DragEffect::Refused(GridError::UnknownSession(id)));
    };

    if session.is_locked {
        return Transition::to(DragState::Idle, DragEffect::Refused(GridError::LockedSession(id)));
    }

    if let Err(error) = session.validate() {
        return Transition::to(DragState::Idle, DragEffect::Refused(error));
    }

    let origin = DragOrigin {
        session_id: session.id.clone(),
        day: session.day,
        start: session.start,
        duration: session.duration_minutes(),
    };

    Transition::to(
        DragState::Dragging {
            origin: origin.clone(),
        },
        DragEffect::Started(origin),
    )
}

/// Snap the pointer to its cell. Emits only when the cell changes.
fn hover(
    origin: DragOrigin,
    current: Option<(DayKey, TimeOfDay)>,
    day: DayKey,
    time: TimeOfDay,
    ctx: &DragContext<'_>,
) -> Transition {
    let snapped = match ctx.grid.snap(time) {
        Ok(slot) => slot.time,
        Err(_) if current.is_some() => {
            let effect = DragEffect::HoverLeft(origin.session_id.clone());
            return Transition::to(DragState::Dragging { origin }, effect);
        }
        Err(_) => return Transition::stay(DragState::Dragging { origin }),
    };

    if current == Some((day, snapped)) {
        return Transition::stay(DragState::HoverSlot {
            origin,
            day,
            time: snapped,
        });
    }

    let effect = DragEffect::HoverChanged {
        session_id: origin.session_id.clone(),
        day,
        time: snapped,
    };

    Transition::to(
        DragState::HoverSlot {
            origin,
            day,
            time: snapped,
        },
        effect,
    )
}

fn drop_on_cell(
    origin: DragOrigin,
    day: DayKey,
    time: TimeOfDay,
    ctx: &DragContext<'_>,
) -> Transition {
    if day == origin.day && time == origin.start {
        return Transition::to(DragState::Idle, DragEffect::Cancelled(origin.session_id));
    }

    let candidate_end = time.minutes() + origin.duration;
    let end = if candidate_end <= ctx.grid.window_end_minutes() {
        TimeOfDay::from_minutes(candidate_end)
    } else {
        None
    };

    let Some(end) = end else {
        let error = GridError::out_of_range(
            candidate_end,
            ctx.grid.first_slot(),
            ctx.grid.last_slot(),
        );
        return Transition::to(DragState::Idle, DragEffect::Reverted { origin, error });
    };

    let intent = MoveIntent {
        session_id: origin.session_id.clone(),
        day,
        start: time,
    };

    Transition::to(
        DragState::Committing {
            pending: PendingMove {
                intent: intent.clone(),
                end,
                origin,
            },
        },
        DragEffect::MoveRequested(intent),
    )
}

fn settle(pending: PendingMove, outcome: CommitOutcome) -> Transition {
    let PendingMove { intent, origin, .. } = pending;

    match outcome {
        CommitOutcome::Resolved(session) if session.id == intent.session_id => {
            Transition::to(DragState::Idle, DragEffect::Committed { session, origin })
        }
        CommitOutcome::Resolved(session) => {
            let error = GridError::MoveRejected {
                id: intent.session_id.clone(),
                reason: format!("host answered with session {}", session.id),
            };
            Transition::to(DragState::Idle, DragEffect::Reverted { origin, error })
        }
        CommitOutcome::Rejected(reason) => {
            let error = GridError::MoveRejected {
                id: intent.session_id.clone(),
                reason,
            };
            Transition::to(DragState::Idle, DragEffect::Reverted { origin, error })
        }
        CommitOutcome::TimedOut => {
            let error = GridError::CommitTimeout(intent.session_id.clone());
            Transition::to(DragState::Idle, DragEffect::Reverted { origin, error })
        }
    }
}

/// Owns the single drag state of a grid and applies inputs to it.
#[derive(Debug, Clone, Default)]
pub struct DragRepositionController {
    state: DragState,
}

impl DragRepositionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn apply(&mut self, input: DragInput, ctx: &DragContext<'_>) -> Option<DragEffect> {
        let previous = self.state.name();
        let Transition { state, effect } = transition(std::mem::take(&mut self.state), input, ctx);
        if previous != state.name() {
            log::debug!("Drag state {} -> {}", previous, state.name());
        }
        self.state = state;
        effect
    }

    /// Optimistic placement while a commit is pending
    pub fn pending(&self) -> Option<&PendingMove> {
        match &self.state {
            DragState::Committing { pending } => Some(pending),
            _ => None,
        }
    }

    /// Abort an in-progress drag (not a pending commit, which belongs to
    /// the host until it answers).
    pub fn force_cancel(&mut self) -> Option<DragEffect> {
        if !self.state.is_dragging() {
            return None;
        }
        let id = self.state.session_id().cloned()?;
        log::debug!("Drag of {} cancelled", id);
        self.state = DragState::Idle;
        Some(DragEffect::Cancelled(id))
    }

    /// Reset to idle if the referenced session vanished from `sessions`.
    pub fn reconcile(&mut self, sessions: &[Session]) -> Option<DragEffect> {
        let id = self.state.session_id()?;
        if sessions.iter().any(|session| &session.id == id) {
            return None;
        }

        let id = id.clone();
        log::info!("Session {} left the snapshot during a drag, resetting", id);
        self.state = DragState::Idle;
        Some(DragEffect::Cancelled(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn grid() -> TimeGridModel {
        TimeGridModel::new(15, t(7, 30), t(18, 30)).unwrap()
    }

    fn sessions() -> Vec<Session> {
        vec![
            Session::new("s1", DayKey::Monday, t(9, 0), t(10, 30)).unwrap(),
            Session::builder()
                .id("locked")
                .day(DayKey::Monday)
                .start(t(11, 0))
                .end(t(12, 0))
                .locked(true)
                .build()
                .unwrap(),
        ]
    }

    fn run(inputs: Vec<DragInput>) -> (DragRepositionController, Vec<DragEffect>) {
        let grid = grid();
        let sessions = sessions();
        let ctx = DragContext {
            grid: &grid,
            sessions: &sessions,
            enabled: true,
        };
        let mut controller = DragRepositionController::new();
        let effects = inputs
            .into_iter()
            .filter_map(|input| controller.apply(input, &ctx))
            .collect();
        (controller, effects)
    }

    fn hover(day: DayKey, hour: u32, minute: u32) -> DragInput {
        DragInput::Hover {
            day,
            time: t(hour, minute),
        }
    }

    #[test]
    fn test_pointer_down_starts_drag() {
        let (controller, effects) = run(vec![DragInput::PointerDown("s1".into())]);
        assert!(controller.state().is_dragging());
        assert_eq!(
            effects,
            vec![DragEffect::Started(DragOrigin {
                session_id: "s1".into(),
                day: DayKey::Monday,
                start: t(9, 0),
                duration: 90,
            })]
        );
    }

    #[test]
    fn test_locked_session_is_inert() {
        let (controller, effects) = run(vec![
            DragInput::PointerDown("locked".into()),
            hover(DayKey::Tuesday, 14, 0),
            DragInput::Drop,
        ]);
        assert!(controller.state().is_idle());
        assert_eq!(
            effects,
            vec![DragEffect::Refused(GridError::LockedSession("locked".into()))]
        );
    }

    #[test]
    fn test_unknown_session_refused() {
        let (controller, effects) = run(vec![DragInput::PointerDown("ghost".into())]);
        assert!(controller.state().is_idle());
        assert!(matches!(
            effects[..],
            [DragEffect::Refused(GridError::UnknownSession(_))]
        ));
    }

    #[test]
    fn test_disabled_drag_ignores_pointer_down() {
        let grid = grid();
        let sessions = sessions();
        let ctx = DragContext {
            grid: &grid,
            sessions: &sessions,
            enabled: false,
        };
        let result = transition(DragState::Idle, DragInput::PointerDown("s1".into()), &ctx);
        assert_eq!(result, Transition::stay(DragState::Idle));
    }

    #[test]
    fn test_hover_snaps_and_drop_requests_move() {
        let (controller, effects) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Tuesday, 14, 5),
            DragInput::Drop,
        ]);

        let intent = MoveIntent {
            session_id: "s1".into(),
            day: DayKey::Tuesday,
            start: t(14, 0),
        };
        assert_eq!(effects.last(), Some(&DragEffect::MoveRequested(intent.clone())));

        let pending = controller.pending().unwrap();
        assert_eq!(pending.intent, intent);
        assert_eq!(pending.end, t(15, 30));
        assert_eq!(pending.origin.start, t(9, 0));
    }

    #[test]
    fn test_hover_within_same_cell_is_quiet() {
        let (controller, effects) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Tuesday, 14, 0),
            hover(DayKey::Tuesday, 14, 10),
            hover(DayKey::Tuesday, 14, 15),
        ]);
        assert_eq!(effects.len(), 3);
        assert!(matches!(
            controller.state(),
            DragState::HoverSlot { time, .. } if *time == t(14, 15)
        ));
    }

    #[test]
    fn test_hover_outside_grid_clears_target() {
        let (controller, effects) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Tuesday, 14, 0),
            hover(DayKey::Tuesday, 6, 0),
        ]);
        assert_eq!(effects.last(), Some(&DragEffect::HoverLeft("s1".into())));
        assert!(matches!(controller.state(), DragState::Dragging { .. }));

        let (controller, effects) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Tuesday, 14, 0),
            hover(DayKey::Tuesday, 6, 0),
            DragInput::Drop,
        ]);
        assert!(controller.state().is_idle());
        assert_eq!(effects.last(), Some(&DragEffect::Cancelled("s1".into())));
        assert!(!effects
            .iter()
            .any(|effect| matches!(effect, DragEffect::MoveRequested(_))));
    }

    #[test]
    fn test_hover_off_grid_before_any_cell_is_ignored() {
        let (controller, effects) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Tuesday, 6, 0),
        ]);
        assert_eq!(effects.len(), 1);
        assert!(matches!(controller.state(), DragState::Dragging { .. }));
    }

    #[test]
    fn test_drop_past_window_reverts() {
        let (controller, effects) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Monday, 18, 15),
            DragInput::Drop,
        ]);
        assert!(controller.state().is_idle());
        match effects.last() {
            Some(DragEffect::Reverted { origin, error }) => {
                assert_eq!(origin.start, t(9, 0));
                assert_eq!(
                    error.to_string(),
                    "19:45 is outside the grid window 07:30-18:30"
                );
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert!(!effects
            .iter()
            .any(|effect| matches!(effect, DragEffect::MoveRequested(_))));
    }

    #[test]
    fn test_drop_ending_on_window_edge_is_allowed() {
        let (controller, _) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Monday, 17, 15),
            DragInput::Drop,
        ]);
        assert_eq!(controller.pending().unwrap().end, t(18, 45));
    }

    #[test]
    fn test_drop_on_origin_is_a_no_op() {
        let (controller, effects) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Monday, 9, 0),
            DragInput::Drop,
        ]);
        assert!(controller.state().is_idle());
        assert_eq!(effects.last(), Some(&DragEffect::Cancelled("s1".into())));
    }

    #[test]
    fn test_cancel_and_drop_outside() {
        for finish in [DragInput::Cancel, DragInput::DropOutside] {
            let (controller, effects) = run(vec![
                DragInput::PointerDown("s1".into()),
                hover(DayKey::Friday, 10, 0),
                finish,
            ]);
            assert!(controller.state().is_idle());
            assert_eq!(effects.last(), Some(&DragEffect::Cancelled("s1".into())));
        }
    }

    #[test]
    fn test_pointer_down_ignored_while_committing() {
        let (controller, effects) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Tuesday, 14, 0),
            DragInput::Drop,
            DragInput::PointerDown("s1".into()),
        ]);
        assert!(controller.state().is_committing());
        assert_eq!(effects.len(), 3);
    }

    #[test]
    fn test_resolved_returns_to_idle() {
        let moved = Session::new("s1", DayKey::Tuesday, t(14, 0), t(15, 30)).unwrap();
        let (controller, effects) = run(vec![
            DragInput::PointerDown("s1".into()),
            hover(DayKey::Tuesday, 14, 0),
            DragInput::Drop,
            DragInput::Outcome(CommitOutcome::Resolved(moved.clone())),
        ]);
        assert!(controller.state().is_idle());
        assert!(matches!(
            effects.last(),
            Some(DragEffect::Committed { session, .. }) if *session == moved
        ));
    }

    #[test]
    fn test_rejected_and_timed_out_revert() {
        let cases = [
            (CommitOutcome::Rejected("room taken".into()), false),
            (CommitOutcome::TimedOut, true),
        ];
        for (outcome, is_timeout) in cases {
            let (controller, effects) = run(vec![
                DragInput::PointerDown("s1".into()),
                hover(DayKey::Tuesday, 14, 0),
                DragInput::Drop,
                DragInput::Outcome(outcome),
            ]);
            assert!(controller.state().is_idle());
            match effects.last() {
                Some(DragEffect::Reverted { origin, error }) => {
                    assert_eq!(origin.day, DayKey::Monday);
                    assert!(error.is_commit_failure());
                    assert_eq!(matches!(error, GridError::CommitTimeout(_)), is_timeout);
                }
                other => panic!("unexpected effect {:?}", other),
            }
        }
    }

    #[test]
    fn test_outcome_without_pending_is_ignored() {
        let (controller, effects) = run(vec![DragInput::Outcome(CommitOutcome::TimedOut)]);
        assert!(controller.state().is_idle());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_force_cancel_leaves_commit_alone() {
        let grid = grid();
        let sessions = sessions();
        let ctx = DragContext {
            grid: &grid,
            sessions: &sessions,
            enabled: true,
        };
        let mut controller = DragRepositionController::new();
        controller.apply(DragInput::PointerDown("s1".into()), &ctx);
        assert_eq!(controller.force_cancel(), Some(DragEffect::Cancelled("s1".into())));
        assert!(controller.state().is_idle());

        controller.apply(DragInput::PointerDown("s1".into()), &ctx);
        controller.apply(hover(DayKey::Tuesday, 14, 0), &ctx);
        controller.apply(DragInput::Drop, &ctx);
        assert_eq!(controller.force_cancel(), None);
        assert!(controller.state().is_committing());
    }

    #[test]
    fn test_reconcile_resets_when_session_disappears() {
        let grid = grid();
        let sessions = sessions();
        let ctx = DragContext {
            grid: &grid,
            sessions: &sessions,
            enabled: true,
        };
        let mut controller = DragRepositionController::new();
        controller.apply(DragInput::PointerDown("s1".into()), &ctx);

        assert_eq!(controller.reconcile(&sessions), None);
        assert!(controller.state().is_dragging());

        assert_eq!(
            controller.reconcile(&sessions[1..]),
            Some(DragEffect::Cancelled("s1".into()))
        );
        assert!(controller.state().is_idle());
    }
}
