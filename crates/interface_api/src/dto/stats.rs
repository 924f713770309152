//! Stats DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use domain_stats::ThrottleOutcome;

#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub outcome: ThrottleOutcome,
    pub last_calculated_at: Option<DateTime<Utc>>,
}
