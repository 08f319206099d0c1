//! Interaction modes and the affordances each one exposes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::models::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Read-only browsing; selection only
    #[default]
    View,
    /// Per-card edit, duplicate and delete
    Edit,
    /// Drag-to-reschedule
    Drag,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::View, ViewMode::Edit, ViewMode::Drag];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::View => "view",
            ViewMode::Edit => "edit",
            ViewMode::Drag => "drag",
        }
    }

    pub fn affordances(&self) -> Affordances {
        match self {
            ViewMode::View => Affordances {
                select: true,
                ..Affordances::default()
            },
            ViewMode::Edit => Affordances {
                select: true,
                drag: false,
                edit: true,
                duplicate: true,
                delete: true,
            },
            ViewMode::Drag => Affordances {
                select: true,
                drag: true,
                ..Affordances::default()
            },
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(ViewMode::View),
            "edit" => Ok(ViewMode::Edit),
            "drag" => Ok(ViewMode::Drag),
            other => Err(format!("Unknown view mode: {}", other)),
        }
    }
}

/// Per-card actions enabled in a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Affordances {
    pub select: bool,
    pub drag: bool,
    pub edit: bool,
    pub duplicate: bool,
    pub delete: bool,
}

/// Card actions gated by mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    Edit,
    Duplicate,
    Delete,
}

impl SessionAction {
    pub fn label(&self) -> &'static str {
        match self {
            SessionAction::Edit => "edit",
            SessionAction::Duplicate => "duplicate",
            SessionAction::Delete => "delete",
        }
    }
}

/// Result of a mode switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub from: ViewMode,
    pub to: ViewMode,
    /// Leaving drag mode cancels any in-progress drag
    pub cancels_drag: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ViewModeController {
    mode: ViewMode,
}

impl ViewModeController {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Returns `None` when `mode` is already active.
    pub fn switch_to(&mut self, mode: ViewMode) -> Option<ModeChange> {
        if mode == self.mode {
            return None;
        }

        let change = ModeChange {
            from: self.mode,
            to: mode,
            cancels_drag: self.mode == ViewMode::Drag,
        };
        log::info!("View mode {} -> {}", change.from, change.to);
        self.mode = mode;
        Some(change)
    }

    pub fn affordances(&self) -> Affordances {
        self.mode.affordances()
    }

    pub fn drag_enabled(&self) -> bool {
        self.affordances().drag
    }

    pub fn allows(&self, action: SessionAction) -> bool {
        let affordances = self.affordances();
        match action {
            SessionAction::Edit => affordances.edit,
            SessionAction::Duplicate => affordances.duplicate,
            SessionAction::Delete => affordances.delete,
        }
    }

    /// Check that `action` may be applied to `session` right now.
    pub fn check_action(&self, action: SessionAction, session: &Session) -> Result<()> {
        if !self.allows(action) {
            return Err(GridError::ActionUnavailable {
                action: action.label(),
                mode: self.mode,
            });
        }
        if session.is_locked {
            return Err(GridError::LockedSession(session.id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::day::DayKey;
    use crate::models::time_of_day::TimeOfDay;
    use test_case::test_case;

    fn session(locked: bool) -> Session {
        Session::builder()
            .id("s1")
            .day(DayKey::Monday)
            .start(TimeOfDay::new(9, 0).unwrap())
            .end(TimeOfDay::new(10, 0).unwrap())
            .locked(locked)
            .build()
            .unwrap()
    }

    #[test_case(ViewMode::View, false, false ; "view is read only")]
    #[test_case(ViewMode::Edit, false, true ; "edit exposes card actions")]
    #[test_case(ViewMode::Drag, true, false ; "drag only drags")]
    fn test_affordances(mode: ViewMode, drag: bool, edit: bool) {
        let affordances = mode.affordances();
        assert!(affordances.select);
        assert_eq!(affordances.drag, drag);
        assert_eq!(affordances.edit, edit);
        assert_eq!(affordances.delete, edit);
    }

    #[test]
    fn test_switch_out_of_drag_cancels() {
        let mut controller = ViewModeController::new(ViewMode::Drag);
        let change = controller.switch_to(ViewMode::Edit).unwrap();
        assert!(change.cancels_drag);
        assert_eq!(controller.mode(), ViewMode::Edit);

        let change = controller.switch_to(ViewMode::View).unwrap();
        assert!(!change.cancels_drag);
        assert_eq!(controller.switch_to(ViewMode::View), None);
    }

    #[test]
    fn test_check_action() {
        let controller = ViewModeController::new(ViewMode::View);
        assert!(matches!(
            controller.check_action(SessionAction::Edit, &session(false)),
            Err(GridError::ActionUnavailable { mode: ViewMode::View, .. })
        ));

        let controller = ViewModeController::new(ViewMode::Edit);
        assert!(controller.check_action(SessionAction::Edit, &session(false)).is_ok());
        assert_eq!(
            controller.check_action(SessionAction::Delete, &session(true)),
            Err(GridError::LockedSession("s1".into()))
        );
        assert!(controller
            .check_action(SessionAction::Duplicate, &session(true))
            .is_err());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Drag".parse::<ViewMode>(), Ok(ViewMode::Drag));
        assert!("zoom".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::Edit.to_string(), "edit");
    }
}
