//! Request issues on a review

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{DecisionIssueId, EndProductEstablishmentId, RequestIssueId, ReviewId};
use crate::decision_issue::DecisionIssue;
use crate::review::BenefitType;

/// An issue the claimant asked to have reviewed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestIssue {
    pub id: RequestIssueId,
    pub review_id: ReviewId,
    pub contested_decision_issue_id: Option<DecisionIssueId>,
    pub rating_issue_reference_id: Option<String>,
    pub rating_issue_profile_date: Option<String>,
    pub contested_rating_issue_reference_id: Option<String>,
    pub contested_rating_issue_profile_date: Option<String>,
    pub contested_issue_description: Option<String>,
    pub issue_category: Option<String>,
    pub benefit_type: BenefitType,
    pub decision_date: Option<NaiveDate>,
    pub end_product_establishment_id: Option<EndProductEstablishmentId>,
    pub prior_review_id: Option<ReviewId>,
    pub removed: bool,
    pub disposition: Option<String>,
}

impl RequestIssue {
    /// Builds the follow-up issue contesting a DTA-error decision
    ///
    /// Linkage to the parent's end product, removal and disposition are
    /// never carried over.
    pub fn dta_follow_up(review_id: ReviewId, issue: &DecisionIssue) -> Self {
        let profile_date = issue.profile_date.map(|date| date.to_string());
        Self {
            id: RequestIssueId::new_v7(),
            review_id,
            contested_decision_issue_id: Some(issue.id),
            rating_issue_reference_id: issue.rating_issue_reference_id.clone(),
            rating_issue_profile_date: profile_date.clone(),
            contested_rating_issue_reference_id: issue.rating_issue_reference_id.clone(),
            contested_rating_issue_profile_date: profile_date,
            contested_issue_description: issue.description.clone(),
            issue_category: issue.issue_category.clone(),
            benefit_type: issue.benefit_type,
            decision_date: issue.approx_decision_date,
            end_product_establishment_id: None,
            prior_review_id: None,
            removed: false,
            disposition: None,
        }
    }
}
