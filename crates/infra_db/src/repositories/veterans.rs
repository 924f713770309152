//! Veteran identity and legacy appeal mirrors

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::DatabaseError;

#[derive(Debug, Clone)]
pub struct VeteranRepository {
    pool: PgPool,
}

impl VeteranRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn file_number_for_ssn(&self, ssn: &str) -> Result<Option<String>, DatabaseError> {
        let file_number = sqlx::query_scalar::<_, String>("SELECT file_number FROM veterans WHERE ssn = $1")
            .bind(ssn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(file_number)
    }

    /// Inserts or updates a veteran's file number
    pub async fn upsert_veteran(&self, ssn: &str, file_number: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO veterans (ssn, file_number) VALUES ($1, $2)
            ON CONFLICT (ssn) DO UPDATE SET file_number = EXCLUDED.file_number
            "#,
        )
        .bind(ssn)
        .bind(file_number)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn legacy_appeals(&self, vbms_id: &str) -> Result<Vec<LegacyAppealRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, LegacyAppealRow>(
            r#"
            SELECT
                appeal_series_id, vbms_id, appeal_ids, status_type, active,
                aoj, program_area, description, updated_at
            FROM legacy_appeal_statuses
            WHERE vbms_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(vbms_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn upsert_legacy_appeal(&self, row: &LegacyAppealRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO legacy_appeal_statuses (
                appeal_series_id, vbms_id, appeal_ids, status_type, active,
                aoj, program_area, description, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (appeal_series_id) DO UPDATE SET
                appeal_ids = EXCLUDED.appeal_ids,
                status_type = EXCLUDED.status_type,
                active = EXCLUDED.active,
                aoj = EXCLUDED.aoj,
                program_area = EXCLUDED.program_area,
                description = EXCLUDED.description,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&row.appeal_series_id)
        .bind(&row.vbms_id)
        .bind(&row.appeal_ids)
        .bind(&row.status_type)
        .bind(row.active)
        .bind(&row.aoj)
        .bind(&row.program_area)
        .bind(&row.description)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Legacy appeal series database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LegacyAppealRow {
    pub appeal_series_id: String,
    pub vbms_id: String,
    pub appeal_ids: Vec<String>,
    pub status_type: String,
    pub active: bool,
    pub aoj: String,
    pub program_area: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}
