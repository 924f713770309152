//! Statistics errors

use thiserror::Error;

use core_kernel::{PortError, TemporalError};

/// Errors that can occur while calculating statistics
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Failed to read review activity: {0}")]
    Source(#[source] PortError),

    #[error("Failed to access stats store: {0}")]
    Store(#[source] PortError),

    #[error("Unknown stats interval: {0}")]
    UnknownInterval(String),

    #[error(transparent)]
    Temporal(#[from] TemporalError),
}
