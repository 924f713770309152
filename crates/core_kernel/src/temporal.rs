//! Service time handling
//!
//! Business dates (receipt dates, "today", stats periods) are evaluated in the
//! service timezone rather than UTC. This module provides:
//! - `Timezone`: a serializable wrapper over `chrono_tz::Tz`
//! - `TimeRange`: a half-open `[start, end)` interval of UTC instants

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid range: start {start} must not be after end {end}")]
    InvalidRange {
        start: String,
        end: String,
    },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Timezone wrapper for the service's business calendar
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::from_name(&s).map_err(serde::de::Error::custom)
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name such as `America/New_York`
    pub fn from_name(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(name.to_string()))
    }

    /// The calendar date of `now` in this timezone
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.0).date_naive()
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Gets local midnight of `date` as UTC
    ///
    /// On DST gaps the earliest valid instant of the day is used.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(chrono::NaiveTime::default());
        match self.0.from_local_datetime(&midnight) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let shifted = midnight + Duration::hours(1);
                self.0
                    .from_local_datetime(&shifted)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
            }
        }
    }

    /// Start of the local calendar month containing `date`, as UTC
    pub fn start_of_month(&self, date: NaiveDate) -> DateTime<Utc> {
        let first = date.with_day(1).unwrap_or(date);
        self.start_of_day(first)
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::America::New_York)
    }
}

/// A half-open interval `[start, end)` of UTC instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a new range; `start` may equal `end` (empty range)
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns true if the range contains the given instant
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
