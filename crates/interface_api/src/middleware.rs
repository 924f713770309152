//! API middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::auth::{validate_token, Claims};
use crate::error::ApiError;
use crate::AppState;

/// Bearer token authentication
///
/// Valid claims are stored in the request extensions for handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        warn!(uri = %request.uri(), "Missing or invalid Authorization header");
        return Err(ApiError::Unauthorized);
    };

    let claims = validate_token(token, &state.config.jwt_secret).map_err(|e| {
        warn!(error = %e, "Token validation failed");
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Request audit log
///
/// Runs inside authentication, so the consumer is known for every logged
/// request that reached a handler.
pub async fn audit_middleware(
    State(_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let consumer = request
        .extensions()
        .get::<Claims>()
        .map(|c| c.sub.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        consumer = %consumer,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "API request"
    );

    response
}
