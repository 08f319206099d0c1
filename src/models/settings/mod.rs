// Settings module
// Grid configuration: slot granularity, visible day window and commit wait

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::day::{DayAxis, DayKey};
use super::time_of_day::TimeOfDay;
use crate::error::GridError;
use crate::grid::time_grid::TimeGridModel;
use crate::grid::view_mode::ViewMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Slot length in minutes
    pub granularity_minutes: u32,
    /// First visible slot
    pub day_start: TimeOfDay,
    /// Last visible slot (inclusive)
    pub day_end: TimeOfDay,
    /// Day columns in display order
    pub days: Vec<DayKey>,
    /// How long the host may take to answer a move before it is rolled back
    pub commit_timeout_ms: u64,
    pub initial_mode: ViewMode,
    /// Number of committed moves kept for undo
    pub history_limit: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            granularity_minutes: 15,
            day_start: TimeOfDay::new(7, 30).expect("07:30 is a valid time"),
            day_end: TimeOfDay::new(18, 30).expect("18:30 is a valid time"),
            days: DayKey::ALL.to_vec(),
            commit_timeout_ms: 5_000,
            initial_mode: ViewMode::View,
            history_limit: 50,
        }
    }
}

impl GridSettings {
    /// Validate by building the grid these settings describe
    pub fn validate(&self) -> Result<(), GridError> {
        if self.commit_timeout_ms == 0 {
            return Err(GridError::InvalidGrid(
                "commit timeout must be greater than zero".to_string(),
            ));
        }
        self.to_time_grid().map(|_| ())
    }

    pub fn to_time_grid(&self) -> Result<TimeGridModel, GridError> {
        let axis = DayAxis::new(self.days.clone())?;
        Ok(TimeGridModel::new(self.granularity_minutes, self.day_start, self.day_end)?.with_days(axis))
    }

    pub fn commit_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_timeout_ms)
    }
}
