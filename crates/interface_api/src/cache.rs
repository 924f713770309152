//! Read-through cache for appeals API responses
//!
//! In-process only: each server instance keeps its own entries. Entries
//! expire after the configured TTL; failed loads are never stored.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::dto::appeals::AppealsResponse;

#[derive(Clone)]
pub struct AppealsCache {
    cache: moka::future::Cache<String, Arc<AppealsResponse>>,
    ttl: Duration,
}

impl std::fmt::Debug for AppealsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppealsCache")
            .field("entry_count", &self.cache.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl AppealsCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        debug!(max_capacity, ttl_seconds = ttl.as_secs(), "Appeals cache created");
        Self { cache, ttl }
    }

    pub fn key(ssn: &str) -> String {
        format!("appeals/v2/{ssn}")
    }

    /// Returns the cached response, or runs `load` and caches its success
    ///
    /// With `force` set the cached entry is ignored and replaced.
    pub async fn fetch<F, E>(&self, ssn: &str, force: bool, load: F) -> Result<Arc<AppealsResponse>, E>
    where
        F: Future<Output = Result<AppealsResponse, E>>,
    {
        let key = Self::key(ssn);
        if !force {
            if let Some(hit) = self.cache.get(&key).await {
                debug!("Appeals cache HIT");
                return Ok(hit);
            }
        }

        debug!(force, "Appeals cache MISS");
        let fresh = Arc::new(load.await?);
        self.cache.insert(key, Arc::clone(&fresh)).await;
        Ok(fresh)
    }

    pub async fn contains(&self, ssn: &str) -> bool {
        self.cache.get(&Self::key(ssn)).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(len: usize) -> AppealsResponse {
        AppealsResponse { data: Vec::with_capacity(len) }
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let cache = AppealsCache::new(10, Duration::from_secs(60));

        cache.fetch("123456789", false, async { Ok::<_, ()>(response(0)) }).await.unwrap();
        let second = cache
            .fetch("123456789", false, async { Err::<AppealsResponse, _>("loader must not run") })
            .await;

        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = AppealsCache::new(10, Duration::from_secs(60));

        let result = cache.fetch("123456789", false, async { Err::<AppealsResponse, _>("boom") }).await;

        assert!(result.is_err());
        assert!(!cache.contains("123456789").await);
    }

    #[tokio::test]
    async fn test_force_reloads() {
        let cache = AppealsCache::new(10, Duration::from_secs(60));
        cache.fetch("123456789", false, async { Ok::<_, ()>(response(0)) }).await.unwrap();

        let reloaded = cache.fetch("123456789", true, async { Err::<AppealsResponse, _>("reloaded") }).await;

        assert_eq!(reloaded.unwrap_err(), "reloaded");
    }

    #[test]
    fn test_key_format() {
        assert_eq!(AppealsCache::key("123456789"), "appeals/v2/123456789");
    }
}
