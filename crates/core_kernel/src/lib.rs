//! Core Kernel - Foundational types for the decision review system
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Strongly-typed identifiers for reviews, issues and end products
//! - Service-timezone helpers and half-open time ranges
//! - Port error and health-check abstractions for adapters

pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use temporal::{Timezone, TimeRange, TemporalError};
pub use identifiers::{
    ReviewId, DecisionIssueId, EndProductEstablishmentId, RequestIssueId,
    TaskId, ProcessingJobId,
};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
