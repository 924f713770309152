//! Review statistics handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;

use domain_stats::{StatsInterval, StatsSnapshot};

use crate::auth::{permissions, require_role, Claims};
use crate::dto::stats::RecalculateResponse;
use crate::{error::ApiError, AppState};

/// Last computed snapshot for an interval
pub async fn get_snapshot(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(interval): Path<String>,
) -> Result<Json<StatsSnapshot>, ApiError> {
    require_role(&claims, permissions::STATS_READ)?;

    let interval = StatsInterval::parse(&interval)?;
    state
        .stats
        .snapshot(interval)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No {interval} stats have been calculated")))
}

/// Throttled recalculation trigger
pub async fn recalculate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<RecalculateResponse>, ApiError> {
    require_role(&claims, permissions::STATS_WRITE)?;

    let outcome = state.stats.throttled_calculate_all(Utc::now()).await?;
    let last_calculated_at = state.stats.last_calculated_at().await?;
    Ok(Json(RecalculateResponse { outcome, last_calculated_at }))
}
