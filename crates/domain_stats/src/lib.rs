//! Decision Review Statistics
//!
//! A fixed table of named metrics is computed over review activity for each
//! reporting interval (hourly, daily, weekly, monthly). The full batch is
//! heavy, so [`StatsAggregator::throttled_calculate_all`] runs it at most once
//! an hour, tracked by a timestamp in the stats store.

pub mod activity;
pub mod interval;
pub mod metric;
pub mod calculations;
pub mod aggregator;
pub mod ports;
pub mod error;

pub use activity::ReviewActivity;
pub use interval::StatsInterval;
pub use metric::{ActivityField, ActivityFilter, Aggregation, Measure, MetricDefinition, percentile};
pub use calculations::REVIEW_CALCULATIONS;
pub use aggregator::{StatsAggregator, StatsSnapshot, ThrottleOutcome, THROTTLE_RECALCULATION_PERIOD_SECS};
pub use ports::{ActivitySource, StatsStore};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{InMemoryActivitySource, InMemoryStatsStore};
pub use error::StatsError;
