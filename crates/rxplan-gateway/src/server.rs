// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use rxplan_classifier::ClassificationEngine;
use rxplan_core::RxplanError;
use rxplan_reference::Refresher;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Optional Prometheus render function for `/metrics`.
pub type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<ClassificationEngine>,
    pub refresher: Arc<Refresher>,
    /// `None` disables `/metrics`.
    pub prometheus_render: Option<MetricsRender>,
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("initialized", &self.engine.health())
            .field("cache_dir", &self.refresher.cache_dir())
            .field(
                "prometheus_render",
                &self.prometheus_render.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

/// Gateway listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/data`.
    pub data_dir: PathBuf,
}

/// Build the application router.
///
/// Routes:
/// - GET /health
/// - POST /api/classify (other methods answer 405)
/// - POST /api/refresh
/// - GET /metrics
/// - GET /data/{file}
pub fn build_router(state: GatewayState, data_dir: impl Into<PathBuf>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/classify",
            post(handlers::post_classify).fallback(handlers::classify_method_not_allowed),
        )
        .route("/api/refresh", post(handlers::post_refresh))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .nest_service("/data", ServeDir::new(data_dir.into()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), RxplanError> {
    let app = build_router(state, &config.data_dir);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RxplanError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RxplanError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
