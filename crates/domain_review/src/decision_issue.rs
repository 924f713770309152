//! Decision issues synced back from the claims system

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{DecisionIssueId, ReviewId};
use crate::review::BenefitType;

/// Dispositions meaning the original decision failed the duty to assist
pub const DTA_ERRORS: [&str; 4] = [
    "DTA Error - PMRs",
    "DTA Error - Fed Recs",
    "DTA Error - Other Recs",
    "DTA Error - Exam/MO",
];

/// Returns true for an exact match against one of [`DTA_ERRORS`]
pub fn is_dta_error(disposition: &str) -> bool {
    DTA_ERRORS.contains(&disposition)
}

/// A decision made on one issue of a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionIssue {
    pub id: DecisionIssueId,
    pub review_id: ReviewId,
    pub disposition: Option<String>,
    pub description: Option<String>,
    pub rating_issue_reference_id: Option<String>,
    pub profile_date: Option<NaiveDate>,
    pub approx_decision_date: Option<NaiveDate>,
    pub promulgation_date: Option<NaiveDate>,
    pub benefit_type: BenefitType,
    pub issue_category: Option<String>,
}

impl DecisionIssue {
    /// Creates a decision issue with the given disposition
    pub fn new(review_id: ReviewId, benefit_type: BenefitType, disposition: impl Into<String>) -> Self {
        Self {
            id: DecisionIssueId::new_v7(),
            review_id,
            disposition: Some(disposition.into()),
            description: None,
            rating_issue_reference_id: None,
            profile_date: None,
            approx_decision_date: None,
            promulgation_date: None,
            benefit_type,
            issue_category: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_approx_decision_date(mut self, date: NaiveDate) -> Self {
        self.approx_decision_date = Some(date);
        self
    }

    pub fn with_promulgation_date(mut self, date: NaiveDate) -> Self {
        self.promulgation_date = Some(date);
        self
    }

    pub fn with_rating_issue(mut self, reference_id: impl Into<String>, profile_date: NaiveDate) -> Self {
        self.rating_issue_reference_id = Some(reference_id.into());
        self.profile_date = Some(profile_date);
        self
    }

    pub fn with_issue_category(mut self, category: impl Into<String>) -> Self {
        self.issue_category = Some(category.into());
        self
    }

    pub fn is_dta_error(&self) -> bool {
        self.disposition.as_deref().map_or(false, is_dta_error)
    }

    /// Whether `other` records the same decision, ignoring ids
    pub fn same_decision_as(&self, other: &DecisionIssue) -> bool {
        self.disposition == other.disposition
            && self.rating_issue_reference_id == other.rating_issue_reference_id
            && self.description == other.description
            && self.benefit_type == other.benefit_type
    }

    /// Text shown for the issue in the status API
    pub fn api_status_description(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.issue_category.clone())
            .unwrap_or_else(|| "Unknown issue".to_string())
    }
}

/// Merges a fresh sync into the decision issues already recorded
///
/// An incoming issue whose id is unknown takes the id of an unclaimed
/// existing issue recording the same decision, so request issues contesting
/// it stay linked. Existing issues left out of the sync are dropped unless
/// `is_referenced` holds for them; those are kept after the synced ones.
pub fn merge_synced_decision_issues(
    existing: Vec<DecisionIssue>,
    incoming: Vec<DecisionIssue>,
    is_referenced: impl Fn(DecisionIssueId) -> bool,
) -> Vec<DecisionIssue> {
    let (resent, mut unclaimed): (Vec<DecisionIssue>, Vec<DecisionIssue>) = existing
        .into_iter()
        .partition(|old| incoming.iter().any(|issue| issue.id == old.id));

    let mut merged: Vec<DecisionIssue> = incoming
        .into_iter()
        .map(|mut issue| {
            if resent.iter().any(|old| old.id == issue.id) {
                return issue;
            }
            if let Some(index) = unclaimed.iter().position(|old| old.same_decision_as(&issue)) {
                issue.id = unclaimed.remove(index).id;
            }
            issue
        })
        .collect();

    merged.extend(unclaimed.into_iter().filter(|old| is_referenced(old.id)));
    merged
}
