//! Domain Adapters
//!
//! PostgreSQL implementations of the `domain_review` and `domain_stats` ports.
//! Each adapter wraps a repository, converts rows to domain models and maps
//! `DatabaseError` to `PortError`.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresReviewAdapter;
//! use domain_review::ReviewPort;
//!
//! let adapter = PostgresReviewAdapter::new(pool);
//! let review = adapter.get_review(review_id).await?;
//! ```

pub mod reviews;
pub mod stats;
pub mod veterans;

pub use reviews::PostgresReviewAdapter;
pub use stats::PostgresStatsAdapter;
pub use veterans::{PostgresVeteranAdapter, DEFAULT_LOOKUP_TIMEOUT};
