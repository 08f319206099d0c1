// Day module
// Day keys of the teaching week and the ordered axis the grid displays

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// A teaching day. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayKey {
    pub const ALL: [DayKey; 6] = [
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday,
        DayKey::Saturday,
    ];

    /// Wire key, e.g. `"monday"`
    pub fn key(&self) -> &'static str {
        match self {
            DayKey::Monday => "monday",
            DayKey::Tuesday => "tuesday",
            DayKey::Wednesday => "wednesday",
            DayKey::Thursday => "thursday",
            DayKey::Friday => "friday",
            DayKey::Saturday => "saturday",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayKey::Monday => "Monday",
            DayKey::Tuesday => "Tuesday",
            DayKey::Wednesday => "Wednesday",
            DayKey::Thursday => "Thursday",
            DayKey::Friday => "Friday",
            DayKey::Saturday => "Saturday",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            DayKey::Monday => "MON",
            DayKey::Tuesday => "TUE",
            DayKey::Wednesday => "WED",
            DayKey::Thursday => "THU",
            DayKey::Friday => "FRI",
            DayKey::Saturday => "SAT",
        }
    }

    /// Map a calendar weekday onto the teaching week. Sunday has no column.
    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(DayKey::Monday),
            Weekday::Tue => Some(DayKey::Tuesday),
            Weekday::Wed => Some(DayKey::Wednesday),
            Weekday::Thu => Some(DayKey::Thursday),
            Weekday::Fri => Some(DayKey::Friday),
            Weekday::Sat => Some(DayKey::Saturday),
            Weekday::Sun => None,
        }
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            DayKey::Monday => Weekday::Mon,
            DayKey::Tuesday => Weekday::Tue,
            DayKey::Wednesday => Weekday::Wed,
            DayKey::Thursday => Weekday::Thu,
            DayKey::Friday => Weekday::Fri,
            DayKey::Saturday => Weekday::Sat,
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        DayKey::ALL
            .iter()
            .copied()
            .find(|day| day.key() == lowered || day.short_label().eq_ignore_ascii_case(&lowered))
            .ok_or_else(|| format!("Unknown day key: {}", s))
    }
}

/// Ordered, duplicate-free set of day columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAxis {
    days: Vec<DayKey>,
}

impl DayAxis {
    pub fn new(days: Vec<DayKey>) -> Result<Self, GridError> {
        if days.is_empty() {
            return Err(GridError::InvalidGrid(
                "day axis must contain at least one day".to_string(),
            ));
        }

        for (i, day) in days.iter().enumerate() {
            if days[..i].contains(day) {
                return Err(GridError::InvalidGrid(format!(
                    "day axis lists {} twice",
                    day
                )));
            }
        }

        Ok(Self { days })
    }

    pub fn days(&self) -> &[DayKey] {
        &self.days
    }

    pub fn contains(&self, day: DayKey) -> bool {
        self.days.contains(&day)
    }

    /// Column index of `day` in display order.
    pub fn position(&self, day: DayKey) -> Option<usize> {
        self.days.iter().position(|d| *d == day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Default for DayAxis {
    fn default() -> Self {
        Self {
            days: DayKey::ALL.to_vec(),
        }
    }
}
