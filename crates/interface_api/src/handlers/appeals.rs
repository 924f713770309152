//! Appeals status API (v2)

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Extension, Json,
};
use tracing::info;

use domain_review::{vacols_id_for_file_number, ReviewError, Ssn};

use crate::auth::{permissions, require_role, Claims};
use crate::dto::appeals::{AppealsQuery, AppealsResponse};
use crate::{error::ApiError, AppState};

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Lists a veteran's decision reviews and legacy appeals
///
/// The veteran is identified by the `ssn` header. Every request resolves the
/// veteran and records an API view; the assembled listing is cached per SSN.
pub async fn index(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    Query(params): Query<AppealsQuery>,
) -> Result<Json<AppealsResponse>, ApiError> {
    require_role(&claims, permissions::APPEALS_READ)?;

    let ssn = Ssn::parse(header(&headers, "ssn").unwrap_or_default())
        .map_err(ApiError::from_appeals_lookup)?;
    let file_number = state
        .appeal_statuses
        .file_number_for(&ssn)
        .await
        .map_err(ApiError::from_appeals_lookup)?;
    let vbms_id = vacols_id_for_file_number(&file_number).map_err(ApiError::from_appeals_lookup)?;

    info!(
        consumer = %claims.sub,
        source = header(&headers, "source").unwrap_or(""),
        vbms_id = %vbms_id,
        "Appeals API view"
    );

    let reload = params.reload.is_some() && !state.config.is_production();
    let strategy = state.config.appeal_status_strategy;
    let service = state.appeal_statuses.clone();

    let response = state
        .appeals_cache
        .fetch(ssn.as_str(), reload, async move {
            let statuses = service.statuses_for(file_number, strategy).await?;
            Ok::<_, ReviewError>(AppealsResponse::from_statuses(&statuses, strategy))
        })
        .await
        .map_err(ApiError::from_appeals_lookup)?;

    Ok(Json(response.as_ref().clone()))
}
