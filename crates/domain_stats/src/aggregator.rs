//! Throttled statistics batch

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use core_kernel::{TimeRange, Timezone};

use crate::calculations::REVIEW_CALCULATIONS;
use crate::error::StatsError;
use crate::interval::StatsInterval;
use crate::metric::MetricDefinition;
use crate::ports::{ActivitySource, StatsStore};

/// The full batch runs at most once per this many seconds
pub const THROTTLE_RECALCULATION_PERIOD_SECS: i64 = 60 * 60;

/// Metric values for one interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub interval: StatsInterval,
    pub range: TimeRange,
    pub calculated_at: DateTime<Utc>,
    /// Metric name to value; `None` when the metric has no data
    pub values: BTreeMap<String, Option<f64>>,
}

impl StatsSnapshot {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }
}

/// Result of a throttled trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleOutcome {
    Calculated,
    Skipped,
}

/// Computes the metric table for every interval
#[derive(Clone)]
pub struct StatsAggregator {
    name: String,
    source: Arc<dyn ActivitySource>,
    store: Arc<dyn StatsStore>,
    timezone: Timezone,
    calculations: &'static [MetricDefinition],
}

impl StatsAggregator {
    pub fn new(
        name: impl Into<String>,
        source: Arc<dyn ActivitySource>,
        store: Arc<dyn StatsStore>,
        timezone: Timezone,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            store,
            timezone,
            calculations: REVIEW_CALCULATIONS,
        }
    }

    pub fn with_calculations(mut self, calculations: &'static [MetricDefinition]) -> Self {
        self.calculations = calculations;
        self
    }

    pub fn cache_key(&self) -> String {
        format!("{}-last-calculated-timestamp", self.name)
    }

    pub async fn last_calculated_at(&self) -> Result<Option<DateTime<Utc>>, StatsError> {
        let seconds = self
            .store
            .read_timestamp(&self.cache_key())
            .await
            .map_err(StatsError::Store)?;
        Ok(seconds.and_then(|s| Utc.timestamp_opt(s, 0).single()))
    }

    /// Computes every metric for one interval ending at `now`
    pub async fn calculate(
        &self,
        interval: StatsInterval,
        now: DateTime<Utc>,
    ) -> Result<StatsSnapshot, StatsError> {
        let range = interval.range_ending(now, &self.timezone)?;
        let mut values = BTreeMap::new();

        for metric in self.calculations {
            let activity = self
                .source
                .activity_between(metric.field, range)
                .await
                .map_err(StatsError::Source)?;
            values.insert(metric.name.to_string(), metric.evaluate(&activity));
        }

        debug!(interval = %interval, metrics = values.len(), "Calculated stats");
        Ok(StatsSnapshot {
            interval,
            range,
            calculated_at: now,
            values,
        })
    }

    /// Computes all intervals, then stores them
    ///
    /// Nothing is written unless every metric of every interval succeeded.
    #[instrument(skip(self), fields(stats = %self.name))]
    pub async fn calculate_all(&self, now: DateTime<Utc>) -> Result<Vec<StatsSnapshot>, StatsError> {
        let mut snapshots = Vec::with_capacity(StatsInterval::ALL.len());
        for interval in StatsInterval::ALL {
            snapshots.push(self.calculate(interval, now).await?);
        }
        for snapshot in &snapshots {
            self.store.write_snapshot(snapshot).await.map_err(StatsError::Store)?;
        }
        Ok(snapshots)
    }

    /// Runs [`Self::calculate_all`] unless it ran within the last hour
    ///
    /// The timestamp check and write are not atomic: two triggers racing in
    /// the same hour can both recalculate. The result is the same either way.
    #[instrument(skip(self), fields(stats = %self.name))]
    pub async fn throttled_calculate_all(&self, now: DateTime<Utc>) -> Result<ThrottleOutcome, StatsError> {
        if let Some(last) = self.last_calculated_at().await? {
            if last > now - Duration::seconds(THROTTLE_RECALCULATION_PERIOD_SECS) {
                debug!(last_calculated_at = %last, "Skipping stats recalculation");
                return Ok(ThrottleOutcome::Skipped);
            }
        }

        self.calculate_all(now).await?;
        self.store
            .write_timestamp(&self.cache_key(), now.timestamp())
            .await
            .map_err(StatsError::Store)?;

        info!(calculated_at = %now, "Recalculated stats");
        Ok(ThrottleOutcome::Calculated)
    }

    /// Last stored snapshot for an interval
    pub async fn snapshot(&self, interval: StatsInterval) -> Result<Option<StatsSnapshot>, StatsError> {
        self.store.read_snapshot(interval).await.map_err(StatsError::Store)
    }
}
