//! Database Test Utilities
//!
//! Testcontainer-backed PostgreSQL for repository and adapter tests.
//! Tests using these helpers need a running Docker daemon and are marked
//! `#[ignore]` so the default test run stays hermetic.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use thiserror::Error;
use tokio::sync::OnceCell;

const POSTGRES_IMAGE: &str = "postgres";
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "decision_reviews_test";

/// Tables cleared between tests, children first
const TABLES: &[&str] = &[
    "processing_jobs",
    "tasks",
    "request_issues",
    "end_product_establishments",
    "decision_issues",
    "reviews",
    "legacy_appeal_statuses",
    "veterans",
    "stats_cache",
];

#[derive(Debug, Error)]
pub enum TestDatabaseError {
    #[error("container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Configuration for test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A migrated PostgreSQL test container
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a container and applies the service migrations
    pub async fn new() -> Result<Self, TestDatabaseError> {
        let container = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr("database system is ready to accept connections"))
            .with_env_var("POSTGRES_USER", POSTGRES_USER)
            .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
            .with_env_var("POSTGRES_DB", POSTGRES_DB)
            .start()
            .await?;

        let port = container.get_host_port_ipv4(5432).await?;
        let host = container.get_host().await?.to_string();
        let config = TestDatabaseConfig {
            host,
            port,
            ..TestDatabaseConfig::default()
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.connection_url())
            .await?;

        infra_db::MIGRATOR.run(&pool).await?;

        Ok(Self {
            _container: container,
            config,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Clears all rows while keeping the schema
    pub async fn clear_data(&self) -> Result<(), TestDatabaseError> {
        for table in TABLES {
            sqlx::query(&format!("TRUNCATE TABLE {table} CASCADE"))
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}

static SHARED_TEST_DB: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// Shared container for tests that tolerate each other's rows
///
/// # Panics
///
/// Panics if the container fails to start.
pub async fn get_shared_test_database() -> Arc<TestDatabase> {
    SHARED_TEST_DB
        .get_or_init(|| async {
            Arc::new(
                TestDatabase::new()
                    .await
                    .expect("Failed to create shared test database"),
            )
        })
        .await
        .clone()
}

/// Fresh container for a single test
pub async fn create_isolated_test_database() -> Result<TestDatabase, TestDatabaseError> {
    TestDatabase::new().await
}

/// Declares a Docker-backed database test with `pool` in scope
#[macro_export]
macro_rules! db_test {
    ($name:ident, |$pool:ident| $body:block) => {
        #[tokio::test]
        #[ignore = "requires docker"]
        async fn $name() {
            let db = $crate::database::create_isolated_test_database()
                .await
                .expect("Failed to create test database");
            let $pool = db.pool().clone();
            $body
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_connection_url() {
        let url = TestDatabaseConfig::default().connection_url();

        assert!(url.starts_with("postgres://"));
        assert!(url.contains(POSTGRES_USER));
        assert!(url.ends_with(POSTGRES_DB));
    }

    #[test]
    fn test_every_table_is_cleared() {
        let schema = include_str!("../../../migrations/20240101_000001_initial_schema.sql");
        let created = schema.matches("CREATE TABLE").count();
        assert_eq!(created, TABLES.len());
    }
}
