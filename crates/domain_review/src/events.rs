//! Status API events, alerts and details for decision reviews

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decision_issue::DecisionIssue;
use crate::review::{Review, ReviewKind};
use crate::status::DerivedStatus;

/// Days a claimant has to contest a decision
const DAYS_TO_CONTEST: i64 = 365;

/// Kinds of dated milestones reported for a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Request,
    Decision,
    DtaError,
    DtaDecision,
    OtherClose,
}

impl EventKind {
    fn suffix(&self) -> &'static str {
        match self {
            EventKind::Request => "request",
            EventKind::Decision => "decision",
            EventKind::DtaError => "dta_error",
            EventKind::DtaDecision => "dta_decision",
            EventKind::OtherClose => "other_close",
        }
    }

    /// Event type name; the DTA decision is reported without a kind prefix
    pub fn api_type(&self, kind: ReviewKind) -> String {
        match self {
            EventKind::DtaDecision => self.suffix().to_string(),
            other => format!("{}_{}", kind.status_prefix(), other.suffix()),
        }
    }
}

/// A dated milestone in the status API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: NaiveDate,
}

/// Alert details for a decided review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDetails {
    pub decision_date: Option<NaiveDate>,
    pub available_options: Vec<String>,
    pub due_date: Option<NaiveDate>,
}

/// An alert shown to the veteran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAlert {
    #[serde(rename = "type")]
    pub alert_type: String,
    pub details: AlertDetails,
}

/// One decided issue in the status details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusIssue {
    pub description: String,
    pub disposition: Option<String>,
}

/// Extra detail attached to a status; empty unless decided
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<StatusIssue>>,
}

/// Status block of the status API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(rename = "type")]
    pub status_type: String,
    pub details: StatusDetails,
}

impl Review {
    /// Date of the decision on this review's own issues
    ///
    /// None once a DTA claim exists, since that claim carries the decision.
    pub fn decision_event_date(&self) -> Option<NaiveDate> {
        if self.dta_claim.is_some() {
            return None;
        }
        let first = self.decision_issues.first()?;
        if self.end_product_establishments.is_empty() {
            first.promulgation_date
        } else {
            first.approx_decision_date
        }
    }

    pub fn dta_error_event_date(&self) -> Option<NaiveDate> {
        if self.end_product_active() || self.dta_claim.is_none() {
            return None;
        }
        self.decision_issues
            .iter()
            .find(|issue| issue.is_dta_error())
            .and_then(|issue| issue.approx_decision_date)
    }

    pub fn dta_decision_event_date(&self) -> Option<NaiveDate> {
        if self.is_active() {
            return None;
        }
        self.dta_claim().and_then(Review::decision_event_date)
    }

    /// Closed without any decision, e.g. a canceled end product
    pub fn other_close_event_date(&self) -> Option<NaiveDate> {
        if self.is_active() || !self.decision_issues.is_empty() {
            return None;
        }
        self.end_product_establishments
            .first()
            .and_then(|ep| ep.last_synced_date())
    }

    /// Dated milestones in reporting order; undated ones are omitted
    pub fn events(&self) -> Vec<ReviewEvent> {
        [
            (EventKind::Request, self.receipt_date),
            (EventKind::Decision, self.decision_event_date()),
            (EventKind::DtaError, self.dta_error_event_date()),
            (EventKind::DtaDecision, self.dta_decision_event_date()),
            (EventKind::OtherClose, self.other_close_event_date()),
        ]
        .into_iter()
        .filter_map(|(kind, date)| {
            date.map(|date| ReviewEvent {
                event_type: kind.api_type(self.kind),
                date,
            })
        })
        .collect()
    }

    /// Deadline to contest the decision on this review
    pub fn due_date_to_appeal_decision(&self) -> Option<NaiveDate> {
        self.decision_date_for_api_alert()
            .map(|date| date + Duration::days(DAYS_TO_CONTEST))
    }

    pub fn decision_date_for_api_alert(&self) -> Option<NaiveDate> {
        if self.dta_claim.is_some() {
            self.dta_decision_event_date()
        } else {
            self.decision_event_date()
        }
    }

    pub fn alerts(&self) -> Vec<ReviewAlert> {
        if self.derived_status() != DerivedStatus::Decision {
            return Vec::new();
        }
        vec![ReviewAlert {
            alert_type: "ama_post_decision".to_string(),
            details: AlertDetails {
                decision_date: self.decision_date_for_api_alert(),
                available_options: self
                    .available_review_options()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                due_date: self.due_date_to_appeal_decision(),
            },
        }]
    }

    /// Own issues minus DTA errors, followed by the DTA claim's issues
    pub fn fetch_all_decision_issues_for_api_status(&self) -> Vec<&DecisionIssue> {
        let own = self.decision_issues.iter().filter(|issue| !issue.is_dta_error());
        let remanded = self
            .dta_claim()
            .into_iter()
            .flat_map(|claim| claim.decision_issues.iter());
        own.chain(remanded).collect()
    }

    pub fn status_details(&self, status: DerivedStatus) -> StatusDetails {
        if status != DerivedStatus::Decision {
            return StatusDetails::default();
        }
        let issues = self
            .fetch_all_decision_issues_for_api_status()
            .into_iter()
            .map(|issue| StatusIssue {
                description: issue.api_status_description(),
                disposition: issue.disposition.clone(),
            })
            .collect();
        StatusDetails { issues: Some(issues) }
    }

    pub fn api_status(&self) -> ApiStatus {
        let status = self.derived_status();
        ApiStatus {
            status_type: status.api_type(self.kind),
            details: self.status_details(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_api_types() {
        assert_eq!(EventKind::Request.api_type(ReviewKind::HigherLevelReview), "hlr_request");
        assert_eq!(EventKind::OtherClose.api_type(ReviewKind::SupplementalClaim), "sc_other_close");
        assert_eq!(EventKind::DtaDecision.api_type(ReviewKind::HigherLevelReview), "dta_decision");
    }

    #[test]
    fn test_details_empty_unless_decided() {
        let review = Review::higher_level_review("123456789", crate::BenefitType::Compensation);
        assert_eq!(review.status_details(DerivedStatus::Closed), StatusDetails::default());
        assert_eq!(
            review.status_details(DerivedStatus::Decision).issues,
            Some(Vec::new())
        );
    }
}
