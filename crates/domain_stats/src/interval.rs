//! Calendar reporting intervals

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{TimeRange, Timezone};

use crate::error::StatsError;

/// Period a snapshot covers, aligned to the service calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsInterval {
    Hourly,
    Daily,
    /// Weeks start on Monday
    Weekly,
    Monthly,
}

impl StatsInterval {
    pub const ALL: [StatsInterval; 4] = [
        StatsInterval::Hourly,
        StatsInterval::Daily,
        StatsInterval::Weekly,
        StatsInterval::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsInterval::Hourly => "hourly",
            StatsInterval::Daily => "daily",
            StatsInterval::Weekly => "weekly",
            StatsInterval::Monthly => "monthly",
        }
    }

    pub fn parse(value: &str) -> Result<Self, StatsError> {
        match value {
            "hourly" => Ok(StatsInterval::Hourly),
            "daily" => Ok(StatsInterval::Daily),
            "weekly" => Ok(StatsInterval::Weekly),
            "monthly" => Ok(StatsInterval::Monthly),
            other => Err(StatsError::UnknownInterval(other.to_string())),
        }
    }

    /// Start of the period containing `now`, in the service timezone
    pub fn period_start(&self, now: DateTime<Utc>, timezone: &Timezone) -> DateTime<Utc> {
        let today = timezone.today(now);
        match self {
            StatsInterval::Hourly => {
                let local = timezone.to_local(now);
                let into_hour = Duration::minutes(i64::from(local.minute()))
                    + Duration::seconds(i64::from(local.second()))
                    + Duration::nanoseconds(i64::from(local.nanosecond()));
                now - into_hour
            }
            StatsInterval::Daily => timezone.start_of_day(today),
            StatsInterval::Weekly => {
                let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                timezone.start_of_day(monday)
            }
            StatsInterval::Monthly => timezone.start_of_month(today),
        }
    }

    /// The current period so far: `[period start, now)`
    pub fn range_ending(&self, now: DateTime<Utc>, timezone: &Timezone) -> Result<TimeRange, StatsError> {
        Ok(TimeRange::new(self.period_start(now, timezone), now)?)
    }
}

impl std::fmt::Display for StatsInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
