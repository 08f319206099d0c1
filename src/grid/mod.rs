//! Interactive week grid: slot geometry, placement, conflicts, selection,
//! view modes and the drag-to-reschedule state machine.

pub mod conflict_overlay;
pub mod drag;
pub mod editor;
pub mod events;
pub mod history;
pub mod placement;
pub mod selection;
pub mod time_grid;
pub mod view_mode;

pub use conflict_overlay::{ConflictFilter, ConflictOverlay, ConflictSnapshot, ConflictSummary};
pub use drag::{CommitOutcome, DragInput, DragRepositionController, DragState, MoveIntent};
pub use editor::{commit_with_timeout, GridEditor, HostRejection, ScheduleHost};
pub use events::{FeedbackLevel, GridEvent};
pub use placement::{GridLayout, Placement, SessionPlacementResolver};
pub use selection::{BulkAction, SelectionManager};
pub use time_grid::{TimeGridModel, TimeSlot};
pub use view_mode::{ViewMode, ViewModeController};
