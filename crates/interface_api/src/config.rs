//! API configuration

use std::time::Duration;

use serde::Deserialize;

use core_kernel::Timezone;
use domain_review::StatusStrategy;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Deployment environment; cache reloads are refused in `prod`
    pub deploy_env: String,
    /// Lifetime of a cached appeals response
    pub appeals_cache_ttl_secs: u64,
    /// Maximum number of cached appeals responses
    pub appeals_cache_capacity: u64,
    /// Which reviews the appeals API reports
    pub appeal_status_strategy: StatusStrategy,
    /// Business calendar timezone
    pub timezone: Timezone,
    /// Interval between throttled stats triggers
    pub stats_tick_secs: u64,
    /// Bound on a single veteran identity lookup
    pub lookup_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/decision_reviews".to_string(),
            log_level: "info".to_string(),
            deploy_env: "development".to_string(),
            appeals_cache_ttl_secs: 20 * 60 * 60,
            appeals_cache_capacity: 10_000,
            appeal_status_strategy: StatusStrategy::AllReviews,
            timezone: Timezone::default(),
            stats_tick_secs: 5 * 60,
            lookup_timeout_ms: 5_000,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.deploy_env == "prod"
    }

    pub fn appeals_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.appeals_cache_ttl_secs)
    }

    pub fn stats_tick(&self) -> Duration {
        Duration::from_secs(self.stats_tick_secs.max(1))
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}
