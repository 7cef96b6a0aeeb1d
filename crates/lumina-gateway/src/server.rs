// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use lumina_agent::AssistantSession;
use lumina_config::model::ServerConfig;
use lumina_core::LuminaError;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The single assistant session. Each request holds the lock for its
    /// whole turn, so turns never interleave.
    pub session: Arc<Mutex<AssistantSession>>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(session: Arc<Mutex<AssistantSession>>) -> Self {
        Self {
            session,
            start_time: Instant::now(),
        }
    }
}

/// Routes:
/// - POST /q
/// - GET /health
/// - GET /stats
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/q", post(handlers::post_query))
        .route("/health", get(handlers::get_health))
        .route("/stats", get(handlers::get_stats))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `host:port` and serve until `shutdown` is cancelled.
///
/// In-flight requests are drained before this returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), LuminaError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LuminaError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| LuminaError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
