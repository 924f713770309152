//! End product establishments tracked in the external claims system

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{EndProductEstablishmentId, ReviewId};

/// Last known status of an end product in the claims system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndProductStatus {
    Pending,
    Cleared,
    Canceled,
    Other(String),
}

impl EndProductStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "PEND" => EndProductStatus::Pending,
            "CLR" => EndProductStatus::Cleared,
            "CAN" => EndProductStatus::Canceled,
            other => EndProductStatus::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            EndProductStatus::Pending => "PEND",
            EndProductStatus::Cleared => "CLR",
            EndProductStatus::Canceled => "CAN",
            EndProductStatus::Other(code) => code,
        }
    }

    /// Cleared and canceled end products are closed
    pub fn is_inactive(&self) -> bool {
        matches!(self, EndProductStatus::Cleared | EndProductStatus::Canceled)
    }
}

/// An end product established for a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndProductEstablishment {
    pub id: EndProductEstablishmentId,
    pub review_id: ReviewId,
    pub reference_id: Option<String>,
    pub code: String,
    pub modifier: Option<String>,
    pub synced_status: Option<EndProductStatus>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl EndProductEstablishment {
    pub fn new(review_id: ReviewId, code: impl Into<String>) -> Self {
        Self {
            id: EndProductEstablishmentId::new_v7(),
            review_id,
            reference_id: None,
            code: code.into(),
            modifier: None,
            synced_status: None,
            last_synced_at: None,
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    pub fn with_reference_id(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Records a status reported by the claims system
    pub fn record_sync(&mut self, status: EndProductStatus, synced_at: DateTime<Utc>) {
        self.synced_status = Some(status);
        self.last_synced_at = Some(synced_at);
    }

    /// Active unless the last synced status is canceled or cleared.
    ///
    /// Uses the stored status only; never triggers a sync.
    pub fn is_active(&self) -> bool {
        !self.synced_status.as_ref().map_or(false, EndProductStatus::is_inactive)
    }

    pub fn last_synced_date(&self) -> Option<NaiveDate> {
        self.last_synced_at.map(|at| at.date_naive())
    }
}
