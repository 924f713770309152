//! Statistics Ports
//!
//! `ActivitySource` supplies review milestones; `StatsStore` is the side cache
//! holding computed snapshots and the last-calculated timestamp.

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError, TimeRange};

use crate::activity::ReviewActivity;
use crate::aggregator::StatsSnapshot;
use crate::interval::StatsInterval;
use crate::metric::ActivityField;

/// Review activity queries
#[async_trait]
pub trait ActivitySource: DomainPort {
    /// Reviews whose `field` milestone falls inside `range`
    async fn activity_between(
        &self,
        field: ActivityField,
        range: TimeRange,
    ) -> Result<Vec<ReviewActivity>, PortError>;
}

/// Side cache for computed statistics
#[async_trait]
pub trait StatsStore: DomainPort {
    /// Reads an epoch-seconds timestamp
    async fn read_timestamp(&self, key: &str) -> Result<Option<i64>, PortError>;

    async fn write_timestamp(&self, key: &str, epoch_seconds: i64) -> Result<(), PortError>;

    /// Replaces the snapshot stored for the snapshot's interval
    async fn write_snapshot(&self, snapshot: &StatsSnapshot) -> Result<(), PortError>;

    async fn read_snapshot(&self, interval: StatsInterval) -> Result<Option<StatsSnapshot>, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! In-memory adapters for tests

    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Activity source over a fixed list of rows
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryActivitySource {
        rows: Arc<RwLock<Vec<ReviewActivity>>>,
        failing: Arc<AtomicBool>,
        queries: Arc<AtomicUsize>,
    }

    impl InMemoryActivitySource {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn add(&self, activity: ReviewActivity) {
            self.rows.write().await.push(activity);
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Number of queries answered or failed
        pub fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for InMemoryActivitySource {}

    #[async_trait]
    impl ActivitySource for InMemoryActivitySource {
        async fn activity_between(
            &self,
            field: ActivityField,
            range: TimeRange,
        ) -> Result<Vec<ReviewActivity>, PortError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("activity source unavailable"));
            }
            Ok(self
                .rows
                .read()
                .await
                .iter()
                .filter(|row| row.timestamp(field).map_or(false, |at| range.contains(at)))
                .cloned()
                .collect())
        }
    }

    /// Stats store backed by hash maps
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryStatsStore {
        timestamps: Arc<RwLock<HashMap<String, i64>>>,
        snapshots: Arc<RwLock<HashMap<StatsInterval, StatsSnapshot>>>,
        snapshot_writes: Arc<AtomicUsize>,
    }

    impl InMemoryStatsStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Total snapshot writes so far
        pub fn snapshot_writes(&self) -> usize {
            self.snapshot_writes.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for InMemoryStatsStore {}

    #[async_trait]
    impl StatsStore for InMemoryStatsStore {
        async fn read_timestamp(&self, key: &str) -> Result<Option<i64>, PortError> {
            Ok(self.timestamps.read().await.get(key).copied())
        }

        async fn write_timestamp(&self, key: &str, epoch_seconds: i64) -> Result<(), PortError> {
            self.timestamps.write().await.insert(key.to_string(), epoch_seconds);
            Ok(())
        }

        async fn write_snapshot(&self, snapshot: &StatsSnapshot) -> Result<(), PortError> {
            self.snapshot_writes.fetch_add(1, Ordering::SeqCst);
            self.snapshots.write().await.insert(snapshot.interval, snapshot.clone());
            Ok(())
        }

        async fn read_snapshot(&self, interval: StatsInterval) -> Result<Option<StatsSnapshot>, PortError> {
            Ok(self.snapshots.read().await.get(&interval).cloned())
        }
    }
}
