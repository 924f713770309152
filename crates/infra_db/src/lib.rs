//! Infrastructure Database Layer
//!
//! PostgreSQL storage for the decision review service using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories own the SQL and
//! return plain row structs; adapters implement the domain ports on top of
//! them and translate rows to domain models.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresReviewAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/decision_reviews")).await?;
//! run_migrations(&pool).await?;
//! let reviews = PostgresReviewAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, DatabaseConfig, MIGRATOR, create_pool, run_migrations};
pub use error::DatabaseError;
pub use adapters::{PostgresReviewAdapter, PostgresStatsAdapter, PostgresVeteranAdapter};
