// SPDX-FileCopyrightText: 2026 Lumina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers: POST /q, GET /health, GET /stats.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::server::GatewayState;

/// Request body for POST /q.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub input: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: error.into() })).into_response()
}

/// POST /q
///
/// Runs one turn and returns the serialized outcome. A missing, empty, or
/// unparseable body is a 400. Input is trimmed before it reaches the
/// session, the same as a shell line.
pub async fn post_query(
    State(state): State<GatewayState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let input = match body {
        Ok(Json(QueryRequest { input: Some(input) })) if !input.trim().is_empty() => input,
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, "Input is required"),
        Err(rejection) => {
            debug!(error = %rejection, "rejected query body");
            return error_response(StatusCode::BAD_REQUEST, "Input is required");
        }
    };

    let mut session = state.session.lock().await;
    match session.process_input(input.trim()).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            error!(error = %e, "query failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /stats
pub async fn get_stats(State(state): State<GatewayState>) -> Response {
    let stats = state.session.lock().await.stats();
    Json(stats).into_response()
}
