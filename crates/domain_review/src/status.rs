//! Lifecycle status derivation
//!
//! Status is never persisted. It is computed on read from a snapshot of three
//! signals: end product activity, the dependent DTA claim, and whether any
//! decision issues exist.

use serde::{Deserialize, Serialize};

use crate::review::{Review, ReviewKind};

/// Coarse lifecycle status of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    Received,
    DtaError,
    Decision,
    Closed,
}

impl DerivedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivedStatus::Received => "received",
            DerivedStatus::DtaError => "dta_error",
            DerivedStatus::Decision => "decision",
            DerivedStatus::Closed => "closed",
        }
    }

    /// Status type name in the status API, e.g. `hlr_received`
    pub fn api_type(&self, kind: ReviewKind) -> String {
        format!("{}_{}", kind.status_prefix(), self.as_str())
    }
}

impl std::fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state status derivation depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub end_product_active: bool,
    pub dependent_claim: Option<Box<StatusSnapshot>>,
    pub has_decision_issues: bool,
}

impl StatusSnapshot {
    /// Active while its own end product is open or the dependent claim is active
    pub fn is_active(&self) -> bool {
        self.end_product_active
            || self
                .dependent_claim
                .as_ref()
                .map_or(false, |dependent| dependent.is_active())
    }
}

impl From<&Review> for StatusSnapshot {
    fn from(review: &Review) -> Self {
        Self {
            end_product_active: review.end_product_active(),
            dependent_claim: review
                .dta_claim()
                .map(|claim| Box::new(StatusSnapshot::from(claim))),
            has_decision_issues: !review.decision_issues.is_empty(),
        }
    }
}

/// Derives the lifecycle status; the first matching rule wins
pub fn derive_status(snapshot: &StatusSnapshot) -> DerivedStatus {
    if snapshot.end_product_active {
        return DerivedStatus::Received;
    }

    match snapshot.dependent_claim.as_deref() {
        Some(dependent) if dependent.is_active() => DerivedStatus::DtaError,
        Some(dependent) => decided_or_closed(dependent.has_decision_issues),
        None => decided_or_closed(snapshot.has_decision_issues),
    }
}

fn decided_or_closed(has_decision_issues: bool) -> DerivedStatus {
    if has_decision_issues {
        DerivedStatus::Decision
    } else {
        DerivedStatus::Closed
    }
}

impl Review {
    pub fn status_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::from(self)
    }

    pub fn derived_status(&self) -> DerivedStatus {
        derive_status(&self.status_snapshot())
    }
}

/// How the status API assembles a veteran's decision reviews
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusStrategy {
    /// Higher-Level Reviews, Supplemental Claims and legacy appeals
    #[default]
    AllReviews,
    /// Legacy appeals only
    LegacyOnly,
}

impl StatusStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all_reviews" => Some(StatusStrategy::AllReviews),
            "legacy_only" => Some(StatusStrategy::LegacyOnly),
            _ => None,
        }
    }

    pub fn includes_reviews(&self) -> bool {
        matches!(self, StatusStrategy::AllReviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(end_product_active: bool, has_decision_issues: bool) -> StatusSnapshot {
        StatusSnapshot {
            end_product_active,
            dependent_claim: None,
            has_decision_issues,
        }
    }

    #[test]
    fn test_empty_snapshot_is_closed() {
        assert_eq!(derive_status(&StatusSnapshot::default()), DerivedStatus::Closed);
    }

    #[test]
    fn test_dependent_claim_decides_status() {
        let mut parent = leaf(false, true);
        parent.dependent_claim = Some(Box::new(leaf(false, false)));
        assert_eq!(derive_status(&parent), DerivedStatus::Closed);

        parent.dependent_claim = Some(Box::new(leaf(false, true)));
        assert_eq!(derive_status(&parent), DerivedStatus::Decision);

        parent.dependent_claim = Some(Box::new(leaf(true, true)));
        assert_eq!(derive_status(&parent), DerivedStatus::DtaError);
    }

    #[test]
    fn test_api_type_prefix() {
        assert_eq!(DerivedStatus::DtaError.api_type(ReviewKind::HigherLevelReview), "hlr_dta_error");
        assert_eq!(DerivedStatus::Closed.api_type(ReviewKind::SupplementalClaim), "sc_closed");
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(StatusStrategy::parse("legacy_only"), Some(StatusStrategy::LegacyOnly));
        assert_eq!(StatusStrategy::parse("v3"), None);
        assert_eq!(StatusStrategy::default(), StatusStrategy::AllReviews);
    }
}
