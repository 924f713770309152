//! Test Utilities Crate
//!
//! Shared test infrastructure for the decision review test suite.
//!
//! # Modules
//!
//! - `fixtures`: fixed reviews, veterans, dates and activity rows
//! - `builders`: review builder for lifecycle states
//! - `database`: PostgreSQL testcontainer helpers
//! - `assertions`: assertion helpers for reviews, stats and API bodies
//! - `generators`: proptest strategies and `fake` text

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
