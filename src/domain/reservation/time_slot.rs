//! Calendar dates, clock times and half-open booking intervals

use std::fmt;

use chrono::NaiveDate;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DomainError, DomainResult};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Minute-of-day clock time, serialized as `HH:MM`.
///
/// `24:00` is accepted as the end of the day so a slot can close at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "10:00")]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn from_minutes(minutes: u16) -> DomainResult<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(DomainError::Validation(format!(
                "Clock time out of range: {} minutes",
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let invalid = || DomainError::Validation(format!("Invalid time '{}', expected HH:MM", raw));

        let (h, m) = raw.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if h.is_empty() || h.len() > 2 || m.len() != 2 || !digits(h) || !digits(m) {
            return Err(invalid());
        }
        let hours: u16 = h.parse().map_err(|_| invalid())?;
        let minutes: u16 = m.parse().map_err(|_| invalid())?;
        if minutes >= 60 || hours > 24 || (hours == 24 && minutes != 0) {
            return Err(invalid());
        }
        Ok(Self(hours * 60 + minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Half-open interval `[start, end)` on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeSlot {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeSlot {
    pub fn new(start: ClockTime, end: ClockTime) -> DomainResult<Self> {
        if start >= end {
            return Err(DomainError::Validation(format!(
                "Time slot start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> DomainResult<Self> {
        Self::new(ClockTime::parse(start)?, ClockTime::parse(end)?)
    }

    /// Back-to-back slots (one ends when the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn within(&self, open: ClockTime, close: ClockTime) -> bool {
        self.start >= open && self.end <= close
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
