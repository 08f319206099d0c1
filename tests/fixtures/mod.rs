// Test fixtures - reusable test data
// Sessions, grids and a scripted host shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use timetable_grid::grid::drag::MoveIntent;
use timetable_grid::grid::editor::{GridEditor, HostRejection, ScheduleHost};
use timetable_grid::grid::selection::{BulkAction, SelectionSet};
use timetable_grid::grid::time_grid::TimeGridModel;
use timetable_grid::grid::view_mode::ViewMode;
use timetable_grid::models::day::DayKey;
use timetable_grid::models::session::{Session, SessionId};
use timetable_grid::models::settings::GridSettings;
use timetable_grid::models::time_of_day::TimeOfDay;

pub fn t(hour: u32, minute: u32) -> TimeOfDay {
    TimeOfDay::new(hour, minute).unwrap()
}

/// 15-minute slots from 07:30 to 18:30, Monday to Saturday
pub fn teaching_grid() -> TimeGridModel {
    GridSettings::default().to_time_grid().unwrap()
}

pub fn session(id: &str, day: DayKey, start: TimeOfDay, end: TimeOfDay) -> Session {
    Session::new(id, day, start, end).unwrap()
}

/// Monday 09:00-10:30 anatomy lecture, Monday 11:00-12:00 locked exam,
/// Tuesday 08:00-09:00 tutorial
pub fn week() -> Vec<Session> {
    vec![
        Session::builder()
            .id("anat")
            .day(DayKey::Monday)
            .start(t(9, 0))
            .end(t(10, 30))
            .course("Anatomy")
            .room("A1")
            .build()
            .unwrap(),
        Session::builder()
            .id("exam")
            .day(DayKey::Monday)
            .start(t(11, 0))
            .end(t(12, 0))
            .locked(true)
            .build()
            .unwrap(),
        session("tut", DayKey::Tuesday, t(8, 0), t(9, 0)),
    ]
}

/// How the scripted host answers the next move
#[derive(Debug, Clone)]
pub enum MoveReply {
    Accept,
    Reject(String),
    /// Sleep this long before accepting
    Stall(Duration),
}

/// Host double that records every request and answers moves from a script.
/// Unscripted moves are accepted.
#[derive(Default)]
pub struct ScriptedHost {
    pub sessions: RefCell<Vec<Session>>,
    pub replies: RefCell<VecDeque<MoveReply>>,
    pub moves: RefCell<Vec<MoveIntent>>,
    pub bulk_calls: RefCell<Vec<(BulkAction, Vec<SessionId>)>>,
    pub fail_bulk: Option<String>,
    pub selection_updates: RefCell<Vec<usize>>,
}

impl ScriptedHost {
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self {
            sessions: RefCell::new(sessions),
            ..Self::default()
        }
    }

    pub fn reply(self, reply: MoveReply) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    pub fn snapshot(&self) -> Vec<Session> {
        self.sessions.borrow().clone()
    }

    fn apply_move(&self, intent: &MoveIntent) -> Result<Session, HostRejection> {
        let mut sessions = self.sessions.borrow_mut();
        let stored = sessions
            .iter_mut()
            .find(|session| session.id == intent.session_id)
            .ok_or_else(|| HostRejection::new("unknown session"))?;
        let moved = stored
            .moved_to(intent.day, intent.start)
            .map_err(|e| HostRejection::new(e.to_string()))?;
        *stored = moved.clone();
        Ok(moved)
    }
}

#[async_trait(?Send)]
impl ScheduleHost for ScriptedHost {
    async fn move_session(&self, intent: &MoveIntent) -> Result<Session, HostRejection> {
        self.moves.borrow_mut().push(intent.clone());
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            Some(MoveReply::Reject(reason)) => Err(HostRejection::new(reason)),
            Some(MoveReply::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                self.apply_move(intent)
            }
            Some(MoveReply::Accept) | None => self.apply_move(intent),
        }
    }

    async fn apply_bulk(&self, action: BulkAction, ids: &[SessionId]) -> Result<(), HostRejection> {
        self.bulk_calls.borrow_mut().push((action, ids.to_vec()));
        match &self.fail_bulk {
            Some(reason) => Err(HostRejection::new(reason.clone())),
            None => Ok(()),
        }
    }

    async fn edit_session(&self, _session: &Session) -> Result<(), HostRejection> {
        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), HostRejection> {
        self.sessions.borrow_mut().retain(|session| &session.id != id);
        Ok(())
    }

    async fn duplicate_session(&self, id: &SessionId) -> Result<Session, HostRejection> {
        let mut sessions = self.sessions.borrow_mut();
        let original = sessions
            .iter()
            .find(|session| &session.id == id)
            .cloned()
            .ok_or_else(|| HostRejection::new("unknown session"))?;
        let copy = Session {
            id: SessionId::new(format!("{}-copy", id)),
            is_locked: false,
            ..original
        };
        sessions.push(copy.clone());
        Ok(copy)
    }

    fn selection_changed(&self, selection: &SelectionSet) {
        self.selection_updates.borrow_mut().push(selection.len());
    }
}

/// Editor over `host` with the default teaching-day settings and the host's
/// sessions already loaded
pub fn editor(host: ScriptedHost, mode: ViewMode) -> GridEditor<ScriptedHost> {
    let settings = GridSettings {
        initial_mode: mode,
        commit_timeout_ms: 200,
        ..GridSettings::default()
    };
    let sessions = host.snapshot();
    let mut editor = GridEditor::new(host, settings).unwrap();
    editor.replace_sessions(sessions);
    editor.drain_events();
    editor
}
