//! Review activity rows the metrics are computed over

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ReviewId;
use domain_review::{BenefitType, ReviewKind};

use crate::metric::{ActivityField, Measure};

/// Milestone timestamps of one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewActivity {
    pub review_id: ReviewId,
    pub kind: ReviewKind,
    pub veteran_file_number: String,
    pub benefit_type: BenefitType,
    pub is_dta_claim: bool,
    /// Taken at intake
    pub received_at: DateTime<Utc>,
    /// End products established
    pub established_at: Option<DateTime<Utc>>,
    /// First decision issue synced
    pub decided_at: Option<DateTime<Utc>>,
}

impl ReviewActivity {
    pub fn timestamp(&self, field: ActivityField) -> Option<DateTime<Utc>> {
        match field {
            ActivityField::Received => Some(self.received_at),
            ActivityField::Established => self.established_at,
            ActivityField::Decided => self.decided_at,
        }
    }

    /// Elapsed seconds for a measure; `None` until the end milestone is reached
    pub fn measure_seconds(&self, measure: Measure) -> Option<f64> {
        let end = match measure {
            Measure::TimeToEstablish => self.established_at?,
            Measure::TimeToDecision => self.decided_at?,
        };
        Some((end - self.received_at).num_seconds() as f64)
    }
}
