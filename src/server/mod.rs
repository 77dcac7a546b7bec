pub mod fixtures;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::AuthService;
use crate::models::ServerConfig;
use crate::runner::{CrawlRunner, SimulatedStepSource, StepSource};
use crate::service::CrawlService;
use crate::storage::jobs::JsonJobStore;
use crate::storage::logs::JsonLogStore;
use crate::storage::users::JsonUserStore;
use crate::storage::{JobStore, LogStore, UserStore};

/// Shared application state for the Axum server.
pub struct AppState {
    pub crawl: CrawlService,
    pub auth: AuthService,
}

/// Wires stores, worker pool, and services together from a config.
pub async fn build_state(config: &ServerConfig) -> Result<Arc<AppState>> {
    build_state_with_steps(config, Arc::new(SimulatedStepSource)).await
}

pub async fn build_state_with_steps(
    config: &ServerConfig,
    steps: Arc<dyn StepSource>,
) -> Result<Arc<AppState>> {
    let data_dir = config.resolved_data_dir();
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context(format!("Failed to create data dir {}", data_dir.display()))?;

    let jobs: Arc<dyn JobStore> = Arc::new(JsonJobStore::new(data_dir.clone()).await?);
    let logs: Arc<dyn LogStore> = Arc::new(JsonLogStore::new(data_dir.clone()).await?);
    let users: Arc<dyn UserStore> = Arc::new(JsonUserStore::new(data_dir).await?);

    let runner = CrawlRunner::new(Arc::clone(&jobs), Arc::clone(&logs), steps, config);
    let crawl = CrawlService::new(jobs, logs, runner, config.log_tail_limit);
    let auth = AuthService::new(users, &config.jwt_secret, config.token_ttl_secs);

    Ok(Arc::new(AppState { crawl, auth }))
}

/// Create the Axum router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/auth/signup", post(routes::signup))
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/validate", post(routes::validate))
        .route("/api/crawl/start", post(routes::start_crawl))
        .route("/api/crawl/summary", get(routes::summary))
        .route("/api/crawl/live", get(routes::live_status))
        .route("/api/crawl/logs", get(routes::live_logs))
        .route("/api/crawl/graph", get(routes::graph))
        .route("/api/crawl/analytics", get(routes::analytics))
        .route("/api/crawl/health", get(routes::health))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Bind and serve until Ctrl+C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = build_state(&config).await?;
    let router = create_router(state);

    let bind_addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context(format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
