//! Health check endpoints

use axum::{http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct PingResponse {
    ok: bool,
    time: DateTime<Utc>,
}

/// Health check handler
async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse {
        status: "healthy".to_string(),
        time: Utc::now(),
    };

    (StatusCode::OK, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Connectivity probe used by the frontend
async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        ok: true,
        time: Utc::now(),
    })
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}

pub fn root_routes() -> Router<AppState> {
    Router::new().route("/test", get(ping))
}
