//! Review DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{DecisionIssueId, ReviewId};
use domain_review::{ApiStatus, BenefitType, DecisionIssue, Review};

use crate::error::ApiError;

/// Decision issues synced from the claims system for one review
#[derive(Debug, Deserialize, Validate)]
pub struct SyncDecisionIssuesRequest {
    #[validate(nested)]
    pub decision_issues: Vec<DecisionIssueInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DecisionIssueInput {
    /// Identifier from an earlier sync; when absent the issue is matched to
    /// a stored one recording the same decision
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub disposition: String,
    #[validate(length(min = 1))]
    pub benefit_type: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub rating_issue_reference_id: Option<String>,
    pub profile_date: Option<NaiveDate>,
    pub approx_decision_date: Option<NaiveDate>,
    pub promulgation_date: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub issue_category: Option<String>,
}

impl DecisionIssueInput {
    pub fn into_decision_issue(self, review_id: ReviewId) -> Result<DecisionIssue, ApiError> {
        let benefit_type = BenefitType::parse(&self.benefit_type)
            .ok_or_else(|| ApiError::validation(format!("unknown benefit_type '{}'", self.benefit_type)))?;

        let mut issue = DecisionIssue::new(review_id, benefit_type, self.disposition);
        if let Some(id) = self.id {
            issue.id = DecisionIssueId::from_uuid(id);
        }
        issue.description = self.description;
        issue.rating_issue_reference_id = self.rating_issue_reference_id;
        issue.profile_date = self.profile_date;
        issue.approx_decision_date = self.approx_decision_date;
        issue.promulgation_date = self.promulgation_date;
        issue.issue_category = self.issue_category;
        Ok(issue)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatusResponse {
    pub review_id: Uuid,
    pub review_type: String,
    pub status: String,
    pub active: bool,
    pub dta_claim_id: Option<Uuid>,
    pub api_status: ApiStatus,
}

impl From<&Review> for ReviewStatusResponse {
    fn from(review: &Review) -> Self {
        Self {
            review_id: *review.id.as_uuid(),
            review_type: review.kind.as_str().to_string(),
            status: review.derived_status().as_str().to_string(),
            active: review.is_active(),
            dta_claim_id: review.dta_claim().map(|claim| *claim.id.as_uuid()),
            api_status: review.api_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(disposition: &str, benefit_type: &str) -> DecisionIssueInput {
        DecisionIssueInput {
            id: None,
            disposition: disposition.to_string(),
            benefit_type: benefit_type.to_string(),
            description: None,
            rating_issue_reference_id: None,
            profile_date: None,
            approx_decision_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            promulgation_date: None,
            issue_category: None,
        }
    }

    #[test]
    fn test_blank_disposition_fails_validation() {
        let request = SyncDecisionIssuesRequest {
            decision_issues: vec![input("", "compensation")],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_unknown_benefit_type_is_rejected() {
        let result = input("granted", "dental").into_decision_issue(ReviewId::new());
        assert!(matches!(result, Err(ApiError::Validation { .. })));
    }

    #[test]
    fn test_input_keeps_dates() {
        let issue = input("DTA Error - PMRs", "compensation")
            .into_decision_issue(ReviewId::new())
            .unwrap();
        assert!(issue.is_dta_error());
        assert_eq!(issue.approx_decision_date, NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_supplied_id_is_kept() {
        let id = Uuid::now_v7();
        let issue = DecisionIssueInput { id: Some(id), ..input("denied", "pension") }
            .into_decision_issue(ReviewId::new())
            .unwrap();
        assert_eq!(issue.id.as_uuid(), &id);
    }
}
