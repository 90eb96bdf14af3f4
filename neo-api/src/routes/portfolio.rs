//! Portfolio endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use neo_core::NeoError;
use neo_services::{NewHolding, NewTransaction};
use serde::Deserialize;
use tracing::info;

use super::{error_response, OkResponse};
use crate::AppState;

/// Request body for creating a portfolio
#[derive(Debug, Deserialize)]
pub struct CreatePortfolioRequest {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Create portfolio routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/portfolio", get(list_portfolios).post(create_portfolio))
        .route("/portfolio/{id}", get(get_portfolio))
        .route("/portfolio/{id}/holdings", post(add_holding))
        .route("/portfolio/{id}/transactions", post(add_transaction))
        .route("/portfolio/{id}/summary", get(get_summary))
}

/// Unwrap a JSON body, reporting decode failures as bad input
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| error_response(NeoError::invalid_input(e.body_text())))
}

async fn create_portfolio(
    State(state): State<AppState>,
    payload: Result<Json<CreatePortfolioRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    info!("Creating portfolio {:?}", req.name);

    match state
        .portfolio_store
        .create(&req.name, req.address.as_deref())
        .await
    {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_portfolios(State(state): State<AppState>) -> impl IntoResponse {
    match state.portfolio_store.list().await {
        Ok(listings) => {
            info!("Returning {} portfolios", listings.len());
            (StatusCode::OK, Json(listings)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("Getting portfolio: {}", id);

    match state.portfolio_store.get(&id).await {
        Ok(portfolio) => (StatusCode::OK, Json(portfolio)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn add_holding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewHolding>, JsonRejection>,
) -> impl IntoResponse {
    let holding = match body(payload) {
        Ok(h) => h,
        Err(resp) => return resp,
    };
    info!("Adding {} {} to portfolio {}", holding.amount, holding.coin_id, id);

    match state.portfolio_store.add_holding(&id, holding).await {
        Ok(_) => (StatusCode::OK, Json(OkResponse { ok: true })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn add_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> impl IntoResponse {
    let tx = match body(payload) {
        Ok(tx) => tx,
        Err(resp) => return resp,
    };
    info!("Recording {} of {} {} on portfolio {}", tx.kind, tx.amount, tx.coin_id, id);

    match state.portfolio_store.add_transaction(&id, tx).await {
        Ok(_) => (StatusCode::OK, Json(OkResponse { ok: true })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("Summarizing portfolio: {}", id);

    match state.portfolio_store.summarize(&id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{app, get_json, post_json, StubMarketData, StubTickers};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn priced_app() -> axum::Router {
        let markets = Arc::new(StubMarketData {
            prices: HashMap::from([
                ("bitcoin".to_string(), 50_000.0),
                ("ethereum".to_string(), 3_000.0),
            ]),
            ..StubMarketData::default()
        });
        app(markets, StubTickers::default())
    }

    async fn create(app: &axum::Router, name: &str) -> String {
        let (status, body) = post_json(app, "/api/portfolio", json!({ "name": name })).await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_portfolio_lifecycle() {
        let app = priced_app();
        let id = create(&app, "Main").await;

        let (status, body) = post_json(
            &app,
            &format!("/api/portfolio/{}/holdings", id),
            json!({"coin_id": "bitcoin", "symbol": "btc", "amount": 2}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));

        // camelCase keys are accepted as well
        let (status, _) = post_json(
            &app,
            &format!("/api/portfolio/{}/holdings", id),
            json!({"coinId": "ethereum", "symbol": "eth", "amount": 10}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = post_json(
            &app,
            &format!("/api/portfolio/{}/transactions", id),
            json!({"type": "deposit", "coin_id": "bitcoin", "symbol": "btc", "amount": 2, "txHash": "0x1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, portfolio) = get_json(&app, &format!("/api/portfolio/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(portfolio["name"], "Main");
        assert_eq!(portfolio["holdings"].as_array().unwrap().len(), 2);
        assert_eq!(portfolio["transactions"][0]["type"], "deposit");
        assert_eq!(portfolio["transactions"][0]["tx_hash"], "0x1");

        let (status, summary) = get_json(&app, &format!("/api/portfolio/{}/summary", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["total_value"], 130000.0);
        assert_eq!(summary["holdings"][0]["value"], 100000.0);
        assert_eq!(summary["transactions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_returns_listings_newest_first() {
        let app = priced_app();
        let first = create(&app, "First").await;
        let second = create(&app, "Second").await;

        let (status, body) = get_json(&app, "/api/portfolio").await;

        assert_eq!(status, StatusCode::OK);
        let listed = body.as_array().unwrap();
        assert_eq!(listed[0]["id"], second.as_str());
        assert_eq!(listed[1]["id"], first.as_str());
        assert!(listed[0].get("holdings").is_none());
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let app = priced_app();

        let (status, _) = get_json(&app, "/api/portfolio/0123456789abcdef0123456789abcdef").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get_json(&app, "/api/portfolio/xyz").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = get_json(&app, "/api/portfolio/xyz/summary").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_mutations_are_400_and_change_nothing() {
        let app = priced_app();
        let id = create(&app, "Main").await;

        let (status, _) = post_json(
            &app,
            &format!("/api/portfolio/{}/holdings", id),
            json!({"coin_id": "bitcoin", "symbol": "btc", "amount": -1}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            &app,
            &format!("/api/portfolio/{}/transactions", id),
            json!({"type": "transfer", "coin_id": "bitcoin", "symbol": "btc", "amount": 1}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            &app,
            &format!("/api/portfolio/{}/holdings", id),
            json!({"symbol": "btc"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, portfolio) = get_json(&app, &format!("/api/portfolio/{}", id)).await;
        assert!(portfolio["holdings"].as_array().unwrap().is_empty());
        assert!(portfolio["transactions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let app = priced_app();
        let (status, _) = post_json(&app, "/api/portfolio", json!({"name": "  "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_portfolio_summary() {
        let markets = Arc::new(StubMarketData {
            down: true,
            ..StubMarketData::default()
        });
        let app = app(markets, StubTickers::default());
        let id = create(&app, "Empty").await;

        let (status, summary) = get_json(&app, &format!("/api/portfolio/{}/summary", id)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["total_value"], 0.0);
        assert!(summary["holdings"].as_array().unwrap().is_empty());
    }
}
