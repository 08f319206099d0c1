//! Discrete slot axis for the week grid.
//!
//! Rows are fixed-length slots from the first to the last visible slot
//! (inclusive); columns are the configured day axis. The model is immutable
//! once built, so two models built from the same inputs are identical.

use crate::error::{GridError, Result};
use crate::models::day::{DayAxis, DayKey};
use crate::models::time_of_day::TimeOfDay;
use crate::utils::time::MINUTES_PER_DAY;

/// One row of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub index: usize,
    pub time: TimeOfDay,
}

impl TimeSlot {
    /// Row starts on the hour
    pub fn is_hour_slot(&self) -> bool {
        self.time.minute() == 0
    }

    /// Row starts on an even hour; drawn with a heavier rule in the gutter
    pub fn is_major_slot(&self) -> bool {
        self.is_hour_slot() && self.time.hour() % 2 == 0
    }

    /// Gutter label, only shown on hour rows
    pub fn label(&self) -> Option<String> {
        self.is_hour_slot().then(|| self.time.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGridModel {
    granularity: u32,
    first: TimeOfDay,
    last: TimeOfDay,
    days: DayAxis,
    slots: Vec<TimeSlot>,
}

impl TimeGridModel {
    /// Build the slot axis `first..=last` in steps of `granularity` minutes.
    pub fn new(granularity: u32, first: TimeOfDay, last: TimeOfDay) -> Result<Self> {
        if granularity == 0 {
            return Err(GridError::InvalidGrid(
                "granularity must be at least one minute".to_string(),
            ));
        }
        if last < first {
            return Err(GridError::InvalidGrid(format!(
                "last slot {} is before first slot {}",
                last, first
            )));
        }

        let window = last.minutes() - first.minutes();
        if window % granularity != 0 {
            return Err(GridError::InvalidGrid(format!(
                "window {}-{} is not a multiple of {} minutes",
                first, last, granularity
            )));
        }
        // window end must be an addressable time of day
        if last.minutes() + granularity >= MINUTES_PER_DAY {
            return Err(GridError::InvalidGrid(format!(
                "last slot {} would end at or past midnight",
                last
            )));
        }

        let count = (window / granularity) as usize + 1;
        let slots = (0..count)
            .filter_map(|index| {
                TimeOfDay::from_minutes(first.minutes() + index as u32 * granularity)
                    .map(|time| TimeSlot { index, time })
            })
            .collect();

        Ok(Self {
            granularity,
            first,
            last,
            days: DayAxis::default(),
            slots,
        })
    }

    pub fn with_days(mut self, days: DayAxis) -> Self {
        self.days = days;
        self
    }

    pub fn granularity(&self) -> u32 {
        self.granularity
    }

    pub fn first_slot(&self) -> TimeOfDay {
        self.first
    }

    pub fn last_slot(&self) -> TimeOfDay {
        self.last
    }

    pub fn days(&self) -> &DayAxis {
        &self.days
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<TimeSlot> {
        self.slots.get(index).copied()
    }

    /// Minutes from midnight where the first slot begins.
    pub fn window_start_minutes(&self) -> u32 {
        self.first.minutes()
    }

    /// Minutes from midnight where the last slot ends. May equal 24:00.
    pub fn window_end_minutes(&self) -> u32 {
        self.last.minutes() + self.granularity
    }

    /// `[start, end)` bounds of slot `index` in minutes from midnight.
    pub fn slot_bounds(&self, index: usize) -> Option<(u32, u32)> {
        self.slot(index).map(|slot| {
            let start = slot.time.minutes();
            (start, start + self.granularity)
        })
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        time >= self.first && time <= self.last
    }

    pub fn is_aligned(&self, time: TimeOfDay) -> bool {
        self.contains(time) && (time.minutes() - self.first.minutes()) % self.granularity == 0
    }

    /// Index of the slot containing `time`.
    ///
    /// Times before the first slot or after the last slot are rejected
    /// rather than clamped.
    pub fn slot_index_of(&self, time: TimeOfDay) -> Result<usize> {
        if !self.contains(time) {
            return Err(GridError::out_of_range(time.minutes(), self.first, self.last));
        }
        Ok(((time.minutes() - self.first.minutes()) / self.granularity) as usize)
    }

    /// Snap `time` down to the start of its slot.
    pub fn snap(&self, time: TimeOfDay) -> Result<TimeSlot> {
        let index = self.slot_index_of(time)?;
        self.slot(index)
            .ok_or_else(|| GridError::out_of_range(time.minutes(), self.first, self.last))
    }

    pub fn check_day(&self, day: DayKey) -> Result<()> {
        if self.days.contains(day) {
            Ok(())
        } else {
            Err(GridError::DayOutOfRange(day))
        }
    }
}
