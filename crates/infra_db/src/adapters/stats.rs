//! PostgreSQL Stats Adapter
//!
//! Supplies review activity from the review tables and keeps computed
//! snapshots and the last-calculated timestamp in `stats_cache`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, PortError, ReviewId, TimeRange};
use domain_review::{BenefitType, ReviewKind};
use domain_stats::{ActivityField, ActivitySource, ReviewActivity, StatsInterval, StatsSnapshot, StatsStore};

use crate::error::DatabaseError;
use crate::repositories::reviews::{ActivityRow, Milestone, ReviewRepository};
use crate::repositories::stats::StatsCacheRepository;

#[derive(Debug, Clone)]
pub struct PostgresStatsAdapter {
    reviews: ReviewRepository,
    cache: StatsCacheRepository,
}

impl PostgresStatsAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reviews: ReviewRepository::new(pool.clone()),
            cache: StatsCacheRepository::new(pool),
        }
    }
}

fn snapshot_key(interval: StatsInterval) -> String {
    format!("stats/{}", interval.as_str())
}

fn milestone(field: ActivityField) -> Milestone {
    match field {
        ActivityField::Received => Milestone::Received,
        ActivityField::Established => Milestone::Established,
        ActivityField::Decided => Milestone::Decided,
    }
}

fn activity_from_row(row: ActivityRow) -> Result<ReviewActivity, DatabaseError> {
    Ok(ReviewActivity {
        review_id: ReviewId::from_uuid(row.review_id),
        kind: ReviewKind::parse(&row.review_kind)
            .ok_or_else(|| DatabaseError::unknown_value("review_kind", &row.review_kind))?,
        veteran_file_number: row.veteran_file_number,
        benefit_type: BenefitType::parse(&row.benefit_type)
            .ok_or_else(|| DatabaseError::unknown_value("benefit_type", &row.benefit_type))?,
        is_dta_claim: row.is_dta_claim,
        received_at: row.received_at,
        established_at: row.established_at,
        decided_at: row.decided_at,
    })
}

impl DomainPort for PostgresStatsAdapter {}

#[async_trait]
impl ActivitySource for PostgresStatsAdapter {
    #[instrument(skip(self), fields(field = field.as_str()))]
    async fn activity_between(
        &self,
        field: ActivityField,
        range: TimeRange,
    ) -> Result<Vec<ReviewActivity>, PortError> {
        let rows = self
            .reviews
            .activity_between(milestone(field), range.start, range.end)
            .await?;
        debug!(rows = rows.len(), "Loaded review activity");
        Ok(rows.into_iter().map(activity_from_row).collect::<Result<_, _>>()?)
    }
}

#[async_trait]
impl StatsStore for PostgresStatsAdapter {
    async fn read_timestamp(&self, key: &str) -> Result<Option<i64>, PortError> {
        Ok(self.cache.get::<i64>(key).await?)
    }

    async fn write_timestamp(&self, key: &str, epoch_seconds: i64) -> Result<(), PortError> {
        Ok(self.cache.put(key, &epoch_seconds).await?)
    }

    async fn write_snapshot(&self, snapshot: &StatsSnapshot) -> Result<(), PortError> {
        Ok(self.cache.put(&snapshot_key(snapshot.interval), snapshot).await?)
    }

    async fn read_snapshot(&self, interval: StatsInterval) -> Result<Option<StatsSnapshot>, PortError> {
        Ok(self.cache.get(&snapshot_key(interval)).await?)
    }
}
