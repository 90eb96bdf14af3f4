//! Router harness with stubbed upstreams

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use neo_core::{
    MarketDataSource, NeoError, NeoResult, PricePoint, Provider, RawCoinDetail, RawMarketEntry,
    Ticker24h, TickerSource,
};
use neo_services::{MarketService, PortfolioStore, PriceReconciler, SqlitePortfolioRepository};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{build_router, AppState};

/// Aggregator stub serving fixed data
#[derive(Default)]
pub struct StubMarketData {
    pub entries: Vec<RawMarketEntry>,
    pub details: HashMap<String, RawCoinDetail>,
    pub prices: HashMap<String, f64>,
    pub chart: Vec<PricePoint>,
    pub down: bool,
    pub calls: AtomicUsize,
}

impl StubMarketData {
    fn hit(&self) -> NeoResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            Err(NeoError::upstream(Provider::CoinGecko, "HTTP 503"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MarketDataSource for StubMarketData {
    async fn coin_markets(&self, _page: u32, per_page: u32) -> NeoResult<Vec<RawMarketEntry>> {
        self.hit()?;
        Ok(self.entries.iter().take(per_page as usize).cloned().collect())
    }

    async fn coin_detail(&self, coin_id: &str) -> NeoResult<RawCoinDetail> {
        self.hit()?;
        self.details
            .get(coin_id)
            .cloned()
            .ok_or_else(|| NeoError::not_found(format!("coin {}", coin_id)))
    }

    async fn simple_prices(&self, coin_ids: &[String]) -> NeoResult<HashMap<String, f64>> {
        self.hit()?;
        Ok(coin_ids
            .iter()
            .filter_map(|id| self.prices.get(id).map(|p| (id.clone(), *p)))
            .collect())
    }

    async fn market_chart(&self, _coin_id: &str, _days: u32) -> NeoResult<Vec<PricePoint>> {
        self.hit()?;
        Ok(self.chart.clone())
    }
}

/// Exchange stub; pairs map to (last, open)
#[derive(Default)]
pub struct StubTickers {
    pub quotes: HashMap<String, (String, String)>,
}

#[async_trait]
impl TickerSource for StubTickers {
    async fn ticker_24h(&self, symbol: &str) -> NeoResult<Ticker24h> {
        let (last, open) = self
            .quotes
            .get(symbol)
            .ok_or_else(|| NeoError::upstream(Provider::Binance, "API error (400)"))?;
        Ok(Ticker24h {
            symbol: symbol.to_string(),
            last_price: Some(Value::String(last.clone())),
            open_price: Some(Value::String(open.clone())),
        })
    }
}

pub fn app(markets: Arc<StubMarketData>, tickers: StubTickers) -> Router {
    let markets: Arc<dyn MarketDataSource> = markets;
    let reconciler = PriceReconciler::new(markets.clone(), Arc::new(tickers));
    let repo = SqlitePortfolioRepository::new_in_memory().unwrap();

    build_router(AppState {
        market_service: Arc::new(MarketService::new(markets.clone(), reconciler)),
        portfolio_store: Arc::new(PortfolioStore::new(Arc::new(repo), markets)),
    })
}

/// Send one request; returns the status and the raw body
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Method::GET, uri, None).await;
    (status, serde_json::from_str(&body).unwrap())
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, body) = send(app, Method::POST, uri, Some(body)).await;
    (status, serde_json::from_str(&body).unwrap())
}
