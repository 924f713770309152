//! Decision Review Service - API Server Binary
//!
//! Starts the HTTP API and the periodic stats trigger.
//!
//! # Usage
//!
//! ```bash
//! API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin decision-review-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_DATABASE_URL` - PostgreSQL connection string (`DATABASE_URL` also accepted)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_DEPLOY_ENV` - `prod` disables appeals cache reloads
//! * `API_APPEALS_CACHE_TTL_SECS` - Appeals cache lifetime (default: 72000)
//! * `API_APPEAL_STATUS_STRATEGY` - `all_reviews` or `legacy_only`
//! * `API_TIMEZONE` - Business calendar timezone (default: America/New_York)
//! * `API_STATS_TICK_SECS` - Seconds between stats triggers (default: 300)
//! * `API_LOOKUP_TIMEOUT_MS` - Veteran lookup timeout (default: 5000)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_stats::StatsAggregator;
use infra_db::{
    create_pool, run_migrations, DatabaseConfig, PostgresReviewAdapter, PostgresStatsAdapter,
    PostgresVeteranAdapter,
};
use interface_api::{config::ApiConfig, create_router, Adapters, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config()?;
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        deploy_env = %config.deploy_env,
        strategy = ?config.appeal_status_strategy,
        "Starting decision review API server"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_url))
        .await
        .context("connecting to database")?;
    run_migrations(&pool).await.context("running migrations")?;

    let reviews = Arc::new(PostgresReviewAdapter::new(pool.clone()));
    let veterans = Arc::new(PostgresVeteranAdapter::new(pool.clone()).with_lookup_timeout(config.lookup_timeout()));
    let stats = Arc::new(PostgresStatsAdapter::new(pool));

    let adapters = Adapters {
        reviews: reviews.clone(),
        intake: reviews,
        veterans: veterans.clone(),
        legacy_appeals: veterans,
        activity: stats.clone(),
        stats_store: stats,
    };
    let state = AppState::new(config.clone(), adapters);
    let stats_tick = spawn_stats_tick(state.stats.clone(), config.stats_tick());

    let app = create_router(state);
    let addr: SocketAddr = config.server_addr().parse().context("parsing server address")?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    stats_tick.abort();
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads `API_*` configuration; a bare `DATABASE_URL` is used when
/// `API_DATABASE_URL` is absent
fn load_config() -> anyhow::Result<ApiConfig> {
    let mut config = ApiConfig::from_env().context("loading configuration")?;
    if std::env::var("API_DATABASE_URL").is_err() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
    }
    Ok(config)
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Triggers the throttled stats batch on a fixed interval
///
/// The batch itself skips work when it already ran within the hour.
fn spawn_stats_tick(stats: StatsAggregator, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match stats.throttled_calculate_all(Utc::now()).await {
                Ok(outcome) => tracing::debug!(?outcome, "Stats tick"),
                Err(e) => tracing::error!(error = %e, "Stats recalculation failed"),
            }
        }
    })
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
