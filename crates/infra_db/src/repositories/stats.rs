//! Stats cache repository
//!
//! Key/value rows in `stats_cache`. Values are JSONB so a timestamp and a
//! full snapshot share one table.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::DatabaseError;

#[derive(Debug, Clone)]
pub struct StatsCacheRepository {
    pool: PgPool,
}

impl StatsCacheRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reads and decodes a cached value
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DatabaseError> {
        let value = sqlx::query_scalar::<_, serde_json::Value>("SELECT value FROM stats_cache WHERE cache_key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        value
            .map(|json| {
                serde_json::from_value(json)
                    .map_err(|e| DatabaseError::SerializationError(format!("stats_cache '{key}': {e}")))
            })
            .transpose()
    }

    /// Inserts or replaces a cached value
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DatabaseError> {
        let json = serde_json::to_value(value)
            .map_err(|e| DatabaseError::SerializationError(format!("stats_cache '{key}': {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO stats_cache (cache_key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (cache_key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
