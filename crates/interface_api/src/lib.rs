//! HTTP API Layer
//!
//! REST API of the decision review service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: appeals status (v2), review status and decision-issue sync,
//!   review statistics, health
//! - **Middleware**: bearer authentication, tracing, audit logging
//! - **DTOs**: request/response data transfer objects
//! - **Cache**: read-through cache of appeals responses
//! - **Error Handling**: consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, Adapters, AppState};
//!
//! let state = AppState::new(config, adapters);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;
pub mod cache;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_review::{
    AppealStatusService, DtaFollowUpService, IntakeProcessingPort, LegacyAppealPort, ReviewPort,
    VeteranLookupPort,
};
use domain_stats::{ActivitySource, StatsAggregator, StatsStore};

use crate::cache::AppealsCache;
use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{appeals, health, reviews, stats};

/// Name under which the review stats batch stores its timestamp
pub const REVIEW_STATS_NAME: &str = "DecisionReviewStats";

/// Port implementations the API is wired to
#[derive(Clone)]
pub struct Adapters {
    pub reviews: Arc<dyn ReviewPort>,
    pub intake: Arc<dyn IntakeProcessingPort>,
    pub veterans: Arc<dyn VeteranLookupPort>,
    pub legacy_appeals: Arc<dyn LegacyAppealPort>,
    pub activity: Arc<dyn ActivitySource>,
    pub stats_store: Arc<dyn StatsStore>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub reviews: Arc<dyn ReviewPort>,
    pub veterans: Arc<dyn VeteranLookupPort>,
    pub appeal_statuses: AppealStatusService,
    pub dta_follow_up: DtaFollowUpService,
    pub stats: StatsAggregator,
    pub appeals_cache: AppealsCache,
}

impl AppState {
    pub fn new(config: ApiConfig, adapters: Adapters) -> Self {
        let appeal_statuses = AppealStatusService::new(
            Arc::clone(&adapters.veterans),
            Arc::clone(&adapters.reviews),
            adapters.legacy_appeals,
        );
        let dta_follow_up = DtaFollowUpService::new(
            Arc::clone(&adapters.reviews),
            adapters.intake,
            config.timezone,
        );
        let stats = StatsAggregator::new(
            REVIEW_STATS_NAME,
            adapters.activity,
            adapters.stats_store,
            config.timezone,
        );
        let appeals_cache = AppealsCache::new(config.appeals_cache_capacity, config.appeals_cache_ttl());

        Self {
            config,
            reviews: adapters.reviews,
            veterans: adapters.veterans,
            appeal_statuses,
            dta_follow_up,
            stats,
            appeals_cache,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let review_routes = Router::new()
        .route("/:id/status", get(reviews::get_status))
        .route("/:id/decision-issues/sync", post(reviews::sync_decision_issues));

    let stats_routes = Router::new()
        .route("/recalculate", post(stats::recalculate))
        .route("/:interval", get(stats::get_snapshot));

    // Protected API routes
    let v1_routes = Router::new()
        .nest("/reviews", review_routes)
        .nest("/stats", stats_routes);

    let v2_routes = Router::new().route("/appeals", get(appeals::index));

    let api_routes = Router::new()
        .nest("/api/v1", v1_routes)
        .nest("/api/v2", v2_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
