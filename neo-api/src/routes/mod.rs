//! API route definitions

mod health;
mod markets;
mod portfolio;

use axum::{http::StatusCode, response::IntoResponse, Json, Router};
use neo_core::NeoError;
use serde::Serialize;
use tracing::{error, warn};

use crate::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Acknowledgement for mutations that return no document
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(markets::routes())
        .merge(portfolio::routes())
        .merge(health::routes())
}

/// Routes mounted outside `/api`
pub fn root_routes() -> Router<AppState> {
    health::root_routes()
}

/// HTTP status for an error surfaced to clients
pub fn status_for(err: &NeoError) -> StatusCode {
    match err {
        NeoError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        NeoError::NotFound(_) => StatusCode::NOT_FOUND,
        NeoError::MalformedId(_) | NeoError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        NeoError::Storage(_) | NeoError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Turn a service error into a `{"error": ...}` response
pub fn error_response(err: NeoError) -> axum::response::Response {
    let status = status_for(&err);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        // Storage details stay in the log
        error!("Request failed: {}", err);
        "Internal server error".to_string()
    } else {
        warn!("Request rejected: {}", err);
        err.to_string()
    };

    (status, Json(ErrorResponse { error: message })).into_response()
}
