//! Appeals status API DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain_review::{
    ApiStatus, BenefitType, LegacyAppealStatus, Review, ReviewAlert, ReviewEvent, StatusDetails, StatusIssue,
    StatusStrategy, VeteranAppealStatuses,
};

#[derive(Debug, Deserialize)]
pub struct AppealsQuery {
    /// Any value requests a cache bypass
    pub reload: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppealsResponse {
    pub data: Vec<AppealEntry>,
}

impl AppealsResponse {
    pub fn from_statuses(statuses: &VeteranAppealStatuses, strategy: StatusStrategy) -> Self {
        let legacy = statuses.legacy_appeals.iter().map(AppealEntry::legacy);
        let data = if strategy.includes_reviews() {
            statuses
                .higher_level_reviews
                .iter()
                .chain(&statuses.supplemental_claims)
                .map(AppealEntry::review)
                .chain(legacy)
                .collect()
        } else {
            legacy.collect()
        };
        Self { data }
    }
}

/// One reported review or legacy appeal series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppealEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub attributes: AppealAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealAttributes {
    pub appeal_ids: Vec<String>,
    pub updated: DateTime<Utc>,
    pub incomplete_history: bool,
    pub active: bool,
    pub description: Option<String>,
    pub location: String,
    pub aoj: String,
    pub program_area: String,
    pub status: ApiStatus,
    pub alerts: Vec<ReviewAlert>,
    pub events: Vec<ReviewEvent>,
    pub issues: Vec<StatusIssue>,
}

impl AppealEntry {
    pub fn review(review: &Review) -> Self {
        let issues = review
            .decision_issues
            .iter()
            .map(|issue| StatusIssue {
                description: issue.api_status_description(),
                disposition: issue.disposition.clone(),
            })
            .collect();

        Self {
            id: review.review_status_id(),
            entry_type: review.kind.api_type().to_string(),
            attributes: AppealAttributes {
                appeal_ids: review.linked_review_ids(),
                updated: review.updated_at,
                incomplete_history: review.incomplete_history(),
                active: review.is_active(),
                description: None,
                location: "aoj".to_string(),
                aoj: review_aoj(review).to_string(),
                program_area: review.program_area().to_string(),
                status: review.api_status(),
                alerts: review.alerts(),
                events: review.events(),
                issues,
            },
        }
    }

    pub fn legacy(appeal: &LegacyAppealStatus) -> Self {
        Self {
            id: appeal.id.clone(),
            entry_type: "legacyAppeal".to_string(),
            attributes: AppealAttributes {
                appeal_ids: appeal.appeal_ids.clone(),
                updated: appeal.updated,
                incomplete_history: false,
                active: appeal.active,
                description: Some(appeal.description.clone()),
                location: "aoj".to_string(),
                aoj: appeal.aoj.clone(),
                program_area: appeal.program_area.clone(),
                status: ApiStatus {
                    status_type: appeal.status_type.clone(),
                    details: StatusDetails::default(),
                },
                alerts: Vec::new(),
                events: Vec::new(),
                issues: Vec::new(),
            },
        }
    }
}

/// Agency of original jurisdiction for a review's benefit line
fn review_aoj(review: &Review) -> &'static str {
    match review.benefit_type {
        BenefitType::Vha => "vha",
        BenefitType::Nca => "nca",
        _ => "vba",
    }
}
