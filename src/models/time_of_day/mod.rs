// Time-of-day module
// Minute-precision wall-clock time used for session bounds and grid slots

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::utils::time::MINUTES_PER_DAY;

/// A time of day with minute precision, serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Build from minutes since midnight. `None` at or past 24:00.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes >= MINUTES_PER_DAY {
            return None;
        }
        Self::new(minutes / 60, minutes % 60)
    }

    /// Parse `HH:MM` (or `HH:MM:SS` with zero seconds, as some backends send).
    pub fn parse(input: &str) -> Result<Self, GridError> {
        let trimmed = input.trim();
        let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| GridError::InvalidTime(input.to_string()))?;

        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(GridError::InvalidTime(input.to_string()));
        }

        Ok(Self(time))
    }

    /// Minutes elapsed since midnight.
    pub fn minutes(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Add minutes without wrapping past midnight.
    pub fn checked_add_minutes(&self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.minutes().checked_add(minutes)?)
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Truncates seconds.
    fn from(time: NaiveTime) -> Self {
        Self(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeOfDay {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}
