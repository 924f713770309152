//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use core_kernel::HealthCheckResult;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adapters: Vec<HealthCheckResult>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        adapters: Vec::new(),
    })
}

/// Readiness check (includes storage and identity lookup)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let adapters = vec![
        state.reviews.health_check().await,
        state.veterans.health_check().await,
    ];
    let ready = adapters.iter().all(HealthCheckResult::is_healthy);

    let status = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (
        status,
        Json(HealthResponse {
            status: if ready { "ready" } else { "unavailable" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            adapters,
        }),
    )
}
