//! API error handling
//!
//! Most endpoints render `{error, message}` bodies. The v2 appeals endpoint
//! keeps its published `{"errors": [...]}` bodies for 404, 422 and 504.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_review::ReviewError;
use domain_stats::StatsError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Validation error: {message}")]
    Validation { message: String, details: Vec<String> },

    #[error("Invalid SSN")]
    InvalidSsn,

    #[error("Veteran not found")]
    VeteranNotFound,

    #[error("Upstream service timed out")]
    UpstreamTimeout,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Error body of the v2 appeals API
#[derive(Debug, Serialize)]
pub struct AppealsErrorResponse {
    pub errors: Vec<AppealsErrorEntry>,
}

#[derive(Debug, Serialize)]
pub struct AppealsErrorEntry {
    pub status: String,
    pub title: String,
    pub detail: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Maps an appeals lookup failure to the v2 error bodies
    pub fn from_appeals_lookup(error: ReviewError) -> Self {
        match error {
            ReviewError::InvalidSsn => ApiError::InvalidSsn,
            ReviewError::VeteranNotFound => ApiError::VeteranNotFound,
            error if error.is_upstream_timeout() => ApiError::UpstreamTimeout,
            other => ApiError::from(other),
        }
    }
}

fn appeals_error(status: StatusCode, title: &str, detail: &str) -> Response {
    let body = AppealsErrorResponse {
        errors: vec![AppealsErrorEntry {
            status: status.as_u16().to_string(),
            title: title.to_string(),
            detail: detail.to_string(),
        }],
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::InvalidSsn => {
                return appeals_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Invalid SSN",
                    "Please enter a valid 9 digit SSN in the 'ssn' header",
                )
            }
            ApiError::VeteranNotFound => {
                return appeals_error(
                    StatusCode::NOT_FOUND,
                    "Veteran not found",
                    "A veteran with that SSN was not found in our systems.",
                )
            }
            ApiError::UpstreamTimeout => {
                return appeals_error(StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout", "Upstream service timed out")
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string(), None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None),
            ApiError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                (!details.is_empty()).then_some(details),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { message, .. } => ApiError::validation(message),
            PortError::Conflict { message } => ApiError::Conflict(message),
            PortError::Connection { .. }
            | PortError::Timeout { .. }
            | PortError::ServiceUnavailable { .. } => ApiError::ServiceUnavailable(err.to_string()),
            other => {
                error!(error = %other, "Port failure");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::ReviewNotFound(id) => ApiError::NotFound(format!("Review {id} not found")),
            ReviewError::Validation(errors) => ApiError::Validation {
                message: "Review is invalid".to_string(),
                details: errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.code))
                    .collect(),
            },
            ReviewError::InvalidReceiptDate(reason) => {
                ApiError::validation(format!("receipt_date: {reason}"))
            }
            ReviewError::InvalidSsn => ApiError::InvalidSsn,
            ReviewError::VeteranNotFound => ApiError::VeteranNotFound,
            ReviewError::Port(port) => ApiError::from(port),
            other @ (ReviewError::MissingApproxDecisionDate { .. } | ReviewError::InvalidFileNumber(_)) => {
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::UnknownInterval(interval) => ApiError::NotFound(format!("Unknown stats interval '{interval}'")),
            StatsError::Source(port) | StatsError::Store(port) => ApiError::from(port),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingPermission(_) => ApiError::Forbidden(err.to_string()),
            AuthError::InvalidToken | AuthError::TokenExpired => ApiError::Unauthorized,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .to_string()
            .lines()
            .map(str::to_string)
            .filter(|line| !line.is_empty())
            .collect();
        ApiError::Validation {
            message: "Request body is invalid".to_string(),
            details,
        }
    }
}
