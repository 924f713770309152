//! Review handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::ReviewId;
use domain_review::DtaFollowUpOutcome;

use crate::auth::{permissions, require_role, Claims};
use crate::dto::reviews::{ReviewStatusResponse, SyncDecisionIssuesRequest};
use crate::{error::ApiError, AppState};

/// Derived status of one review
pub async fn get_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewStatusResponse>, ApiError> {
    require_role(&claims, permissions::REVIEWS_READ)?;

    let review = state.reviews.get_review(ReviewId::from_uuid(id)).await?;
    Ok(Json(ReviewStatusResponse::from(&review)))
}

/// Decision-issue sync callback
///
/// Replaces the review's decision issues and creates the DTA follow-up claim
/// when any issue was returned for a duty-to-assist error.
pub async fn sync_decision_issues(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<SyncDecisionIssuesRequest>,
) -> Result<Json<DtaFollowUpOutcome>, ApiError> {
    require_role(&claims, permissions::REVIEWS_SYNC)?;
    request.validate()?;

    let review_id = ReviewId::from_uuid(id);
    let issues = request
        .decision_issues
        .into_iter()
        .map(|issue| issue.into_decision_issue(review_id))
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = state.dta_follow_up.sync_decision_issues(review_id, issues).await?;
    Ok(Json(outcome))
}
