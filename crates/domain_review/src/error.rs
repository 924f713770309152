//! Decision review domain errors

use thiserror::Error;

use core_kernel::{PortError, ReviewId};
use crate::review::{FieldError, ReceiptDateError};

/// Errors that can occur in the decision review domain
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Invalid SSN: expected 9 digits")]
    InvalidSsn,

    #[error("Veteran not found")]
    VeteranNotFound,

    #[error("Invalid file number: {0}")]
    InvalidFileNumber(String),

    #[error("Invalid receipt date: {0}")]
    InvalidReceiptDate(ReceiptDateError),

    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Raised while spawning a DTA claim; a data integrity failure, never retried
    #[error("approx_decision_date is required to create a DTA Supplemental Claim (review {review_id})")]
    MissingApproxDecisionDate { review_id: ReviewId },

    #[error("Review not found: {0}")]
    ReviewNotFound(ReviewId),

    #[error(transparent)]
    Port(#[from] PortError),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.code))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ReviewError {
    /// Errors that indicate broken data rather than a bad request
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReviewError::MissingApproxDecisionDate { .. })
    }

    pub fn is_upstream_timeout(&self) -> bool {
        matches!(self, ReviewError::Port(PortError::Timeout { .. }))
    }
}
