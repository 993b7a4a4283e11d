pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod export;
pub mod import;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::cache::ListCache;
use crate::config::Config;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: PgPool, config: Config) -> (Router, SharedState) {
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        pool,
        cache: ListCache::new(Duration::from_secs(config.cache_ttl_secs)),
        login_limiter: LoginRateLimiter::new(),
        config,
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body_size)),
        )
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state.clone());

    (app, state)
}

/// Periodically drop expired cache entries, stale login counters and expired
/// refresh tokens.
pub async fn run_janitor(state: SharedState) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    loop {
        interval.tick().await;
        state.cache.purge_expired();
        state.login_limiter.cleanup(Duration::from_secs(15 * 60));
        match db::refresh_tokens::delete_expired(&state.pool).await {
            Ok(0) => {}
            Ok(n) => tracing::debug!("Removed {n} expired refresh tokens"),
            Err(e) => tracing::warn!("Refresh token cleanup failed: {e}"),
        }
    }
}

async fn health() -> &'static str {
    "ok"
}
