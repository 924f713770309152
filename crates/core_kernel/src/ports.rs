//! Ports and Adapters Infrastructure
//!
//! Shared types for the hexagonal (ports and adapters) layout used by the
//! domain crates. Each domain defines its own port traits extending
//! `DomainPort`; adapters provide PostgreSQL, in-memory, or external
//! implementations behind them.
//!
//! ```text
//!   services (DtaFollowUpService, StatsAggregator, ...)
//!          │
//!          ▼
//!   port traits (ReviewPort, VeteranLookupPort, StatsStore, ...)
//!          ▲                         ▲
//!   PostgreSQL adapters        in-memory mock adapters
//! ```

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error returned by every port implementation
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// The backing store or upstream system cannot take requests
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// A stored value could not be mapped to a domain type
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Validation error with field information
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        PortError::Timeout {
            operation: operation.into(),
            duration_ms,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Failures that may succeed when retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::Timeout { .. } | PortError::ServiceUnavailable { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Supertrait of every port; ports are shared across tokio tasks
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Unhealthy,
}

/// Health check result reported on the readiness endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    /// Failure detail for unhealthy adapters
    pub message: Option<String>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    /// Creates a result stamped with the current time
    pub fn new(
        adapter_id: impl Into<String>,
        status: AdapterHealth,
        latency_ms: u64,
        message: Option<String>,
    ) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status,
            latency_ms,
            message,
            checked_at: chrono::Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Adapters probed by the readiness endpoint
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Review", "123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Review"));
        assert!(error.to_string().contains("123"));
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "fetch_file_number_by_ssn".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());

        let unavailable = PortError::ServiceUnavailable {
            service: "bgs".to_string(),
        };
        assert!(unavailable.is_transient());

        let validation = PortError::validation("Invalid disposition");
        assert!(!validation.is_transient());
    }

    #[test]
    fn test_health_result_reports_status() {
        let healthy = HealthCheckResult::new("postgres", AdapterHealth::Healthy, 3, None);
        let unhealthy = HealthCheckResult::new("bgs", AdapterHealth::Unhealthy, 5000, Some("timed out".to_string()));

        assert!(healthy.is_healthy());
        assert!(!unhealthy.is_healthy());
        assert_eq!(serde_json::to_value(unhealthy.status).unwrap(), "unhealthy");
    }
}
