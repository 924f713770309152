//! DTA follow-up claims
//!
//! When the claims system reports decision issues with a "Duty to Assist"
//! error disposition on a Higher-Level Review, a dependent Supplemental Claim
//! is created to readjudicate them. The claim is created at most once per
//! parent review and then advanced through the same steps as a claim taken
//! at intake. When those steps are interrupted, the next sync of the parent
//! finds the claim without a processing job and runs them again.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use core_kernel::{ProcessingJobId, ReviewId, Timezone};

use crate::decision_issue::DecisionIssue;
use crate::error::ReviewError;
use crate::ports::{DependentClaimCreation, IntakeProcessingPort, ReviewPort};
use crate::request_issue::RequestIssue;
use crate::review::{Review, ReviewKind};
use crate::workflow::decision_review_task_for;

/// Decision issues with a DTA error disposition, in stored order
pub fn dta_issues_needing_follow_up(review: &Review) -> Vec<&DecisionIssue> {
    review
        .decision_issues
        .iter()
        .filter(|issue| issue.is_dta_error())
        .collect()
}

/// A dependent claim and its follow-up issues, not yet persisted
#[derive(Debug, Clone)]
pub struct DtaFollowUpPlan {
    pub claim: Review,
    pub issues: Vec<RequestIssue>,
}

/// Plans the DTA follow-up claim for a Higher-Level Review
///
/// Returns `Ok(None)` when no decision issue needs follow-up. The receipt date
/// of the new claim is the approximate decision date of the first DTA error
/// issue; when that date is missing the claim cannot be created at all.
pub fn plan_dta_follow_up(
    parent: &Review,
    today: NaiveDate,
) -> Result<Option<DtaFollowUpPlan>, ReviewError> {
    if parent.kind != ReviewKind::HigherLevelReview {
        return Ok(None);
    }

    let dta_issues = dta_issues_needing_follow_up(parent);
    let Some(first) = dta_issues.first() else {
        return Ok(None);
    };
    let receipt_date = first
        .approx_decision_date
        .ok_or(ReviewError::MissingApproxDecisionDate { review_id: parent.id })?;

    let mut claim = Review::supplemental_claim(parent.veteran_file_number.clone(), parent.benefit_type)
        .with_receipt_date(receipt_date)
        .with_legacy_opt_in_approved(parent.legacy_opt_in_approved);
    claim.decision_review_remanded = Some(parent.id);
    claim.veteran_is_not_claimant = parent.veteran_is_not_claimant;
    claim.claimant = parent.claimant.clone();
    claim.validate_receipt_date(today)?;

    let issues = dta_issues
        .into_iter()
        .map(|issue| RequestIssue::dta_follow_up(claim.id, issue))
        .collect();

    Ok(Some(DtaFollowUpPlan { claim, issues }))
}

/// What a decision-issue sync did about DTA errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DtaFollowUpOutcome {
    /// No DTA error dispositions
    NotNeeded,
    /// A dependent claim was created and submitted
    Created { claim_id: ReviewId, issue_count: usize },
    /// An earlier attempt created the claim but stopped before queuing its
    /// processing job; the remaining intake steps were run
    Resumed { claim_id: ReviewId, issue_count: usize },
    /// The parent already had a fully processed dependent claim; nothing was done
    AlreadyExists { claim_id: ReviewId },
}

/// Creates DTA follow-up claims when decision issues are synced
#[derive(Clone)]
pub struct DtaFollowUpService {
    reviews: Arc<dyn ReviewPort>,
    intake: Arc<dyn IntakeProcessingPort>,
    timezone: Timezone,
}

impl DtaFollowUpService {
    pub fn new(
        reviews: Arc<dyn ReviewPort>,
        intake: Arc<dyn IntakeProcessingPort>,
        timezone: Timezone,
    ) -> Self {
        Self { reviews, intake, timezone }
    }

    /// Records synced decision issues then runs the follow-up check
    #[instrument(skip(self, issues), fields(review_id = %review_id, issue_count = issues.len()))]
    pub async fn sync_decision_issues(
        &self,
        review_id: ReviewId,
        issues: Vec<DecisionIssue>,
    ) -> Result<DtaFollowUpOutcome, ReviewError> {
        self.reviews
            .record_decision_issues(review_id, issues)
            .await
            .map_err(|e| not_found_as_review(e, review_id))?;
        self.on_decision_issues_sync_processed(review_id).await
    }

    /// Spawns the dependent claim for a review whose decision issues were synced
    #[instrument(skip(self), fields(review_id = %review_id))]
    pub async fn on_decision_issues_sync_processed(
        &self,
        review_id: ReviewId,
    ) -> Result<DtaFollowUpOutcome, ReviewError> {
        let parent = self
            .reviews
            .get_review(review_id)
            .await
            .map_err(|e| not_found_as_review(e, review_id))?;

        let today = self.timezone.today(Utc::now());
        let plan = match plan_dta_follow_up(&parent, today) {
            Ok(Some(plan)) => plan,
            Ok(None) => return Ok(DtaFollowUpOutcome::NotNeeded),
            Err(e) => {
                if e.is_fatal() {
                    tracing::error!(error = %e, "Cannot create DTA supplemental claim");
                }
                return Err(e);
            }
        };

        let DtaFollowUpPlan { claim, issues } = plan;
        match self.reviews.create_dta_claim(claim).await? {
            DependentClaimCreation::Created(claim) => {
                let issue_count = issues.len();
                let job_id = self.run_intake(&claim, issues).await?;
                info!(
                    claim_id = %claim.id,
                    issue_count,
                    job_id = %job_id,
                    "Created DTA supplemental claim"
                );
                Ok(DtaFollowUpOutcome::Created { claim_id: claim.id, issue_count })
            }
            DependentClaimCreation::AlreadyExists(existing) => {
                if let Some(job_id) = self.intake.processing_job_for(existing.id).await? {
                    warn!(claim_id = %existing.id, job_id = %job_id, "DTA supplemental claim already exists");
                    return Ok(DtaFollowUpOutcome::AlreadyExists { claim_id: existing.id });
                }

                warn!(claim_id = %existing.id, "Resuming intake of DTA supplemental claim");
                let issues: Vec<RequestIssue> = issues
                    .into_iter()
                    .map(|issue| RequestIssue { review_id: existing.id, ..issue })
                    .collect();
                let issue_count = issues.len();
                let job_id = self.run_intake(&existing, issues).await?;
                info!(
                    claim_id = %existing.id,
                    issue_count,
                    job_id = %job_id,
                    "Resumed DTA supplemental claim intake"
                );
                Ok(DtaFollowUpOutcome::Resumed { claim_id: existing.id, issue_count })
            }
        }
    }

    /// Advances a claim through intake; safe to repeat after a partial run
    async fn run_intake(
        &self,
        claim: &Review,
        issues: Vec<RequestIssue>,
    ) -> Result<ProcessingJobId, ReviewError> {
        self.intake.create_issues(claim.id, issues).await?;
        if let Some(task) = decision_review_task_for(claim) {
            self.intake.create_task(task).await?;
        }
        self.intake.submit_for_processing(claim.id).await?;
        Ok(self.intake.start_processing_job(claim.id).await?)
    }
}

fn not_found_as_review(error: core_kernel::PortError, review_id: ReviewId) -> ReviewError {
    if error.is_not_found() {
        ReviewError::ReviewNotFound(review_id)
    } else {
        ReviewError::Port(error)
    }
}
