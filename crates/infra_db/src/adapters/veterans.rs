//! PostgreSQL Veteran Adapter
//!
//! Identity lookups and legacy appeal statuses served from local mirror
//! tables. Lookups are bounded by a timeout so a slow database surfaces as
//! `PortError::Timeout`, the same as a slow upstream service would.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_review::{LegacyAppealPort, LegacyAppealStatus, Ssn, VeteranLookupPort};

use crate::repositories::veterans::{LegacyAppealRow, VeteranRepository};

/// Default bound on a single identity lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PostgresVeteranAdapter {
    repository: VeteranRepository,
    lookup_timeout: Duration,
}

impl PostgresVeteranAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VeteranRepository::new(pool),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn repository(&self) -> &VeteranRepository {
        &self.repository
    }
}

fn appeal_from_row(row: LegacyAppealRow) -> LegacyAppealStatus {
    LegacyAppealStatus {
        id: row.appeal_series_id,
        appeal_ids: row.appeal_ids,
        status_type: row.status_type,
        active: row.active,
        aoj: row.aoj,
        program_area: row.program_area,
        description: row.description,
        updated: row.updated_at,
    }
}

impl DomainPort for PostgresVeteranAdapter {}

#[async_trait]
impl HealthCheckable for PostgresVeteranAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.repository.pool())
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::new("postgres-veteran-adapter", AdapterHealth::Healthy, latency_ms, None),
            Err(e) => HealthCheckResult::new(
                "postgres-veteran-adapter",
                AdapterHealth::Unhealthy,
                latency_ms,
                Some(format!("Database error: {e}")),
            ),
        }
    }
}

#[async_trait]
impl VeteranLookupPort for PostgresVeteranAdapter {
    #[instrument(skip_all)]
    async fn fetch_file_number_by_ssn(&self, ssn: &Ssn) -> Result<Option<String>, PortError> {
        match tokio::time::timeout(self.lookup_timeout, self.repository.file_number_for_ssn(ssn.as_str())).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(timeout_ms = self.lookup_timeout.as_millis() as u64, "Veteran lookup timed out");
                Err(PortError::timeout(
                    "fetch_file_number_by_ssn",
                    self.lookup_timeout.as_millis() as u64,
                ))
            }
        }
    }
}

#[async_trait]
impl LegacyAppealPort for PostgresVeteranAdapter {
    #[instrument(skip(self))]
    async fn appeals_for(&self, vbms_id: &str) -> Result<Vec<LegacyAppealStatus>, PortError> {
        let rows = self.repository.legacy_appeals(vbms_id).await?;
        Ok(rows.into_iter().map(appeal_from_row).collect())
    }
}
