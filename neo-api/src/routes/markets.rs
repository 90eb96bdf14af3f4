//! Market-related API endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use neo_core::{NeoError, PriceHistory};
use neo_services::{DEFAULT_HISTORY_DAYS, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use serde::Deserialize;
use tracing::info;

use super::error_response;
use crate::AppState;

/// Query parameters for listing markets
#[derive(Debug, Deserialize)]
pub struct MarketsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Query parameters for price history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Days of history (1..=365)
    pub days: Option<i64>,
}

/// Create market routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/markets", get(list_markets))
        .route("/coin/{coin_id}", get(get_coin))
        .route("/coin/{coin_id}/history", get(get_history))
}

/// One page of coins by market cap
async fn list_markets(
    State(state): State<AppState>,
    params: Result<Query<MarketsQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = match params {
        Ok(q) => q,
        Err(e) => return error_response(NeoError::invalid_input(e.body_text())),
    };
    info!("Listing markets with params: {:?}", params);

    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);

    match state.market_service.markets(page, per_page).await {
        Ok(rows) => {
            info!("Returning {} markets", rows.len());
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Detail view of a single coin
async fn get_coin(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> impl IntoResponse {
    info!("Getting coin: {}", coin_id);

    match state.market_service.coin(&coin_id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => error_response(e),
    }
}

/// USD price history of a coin
async fn get_history(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
    params: Result<Query<HistoryQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = match params {
        Ok(q) => q,
        Err(e) => return error_response(NeoError::invalid_input(e.body_text())),
    };
    let days = params.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    info!("Getting {} days of history for {}", days, coin_id);

    match state.market_service.price_history(&coin_id, days).await {
        Ok(prices) => (StatusCode::OK, Json(PriceHistory { prices })).into_response(),
        Err(e) => error_response(e),
    }
}
