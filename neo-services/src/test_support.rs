//! In-process doubles for the upstream sources

use async_trait::async_trait;
use neo_core::{
    MarketDataSource, NeoError, NeoResult, PricePoint, Provider, RawCoinDetail, RawMarketEntry,
    Ticker24h, TickerSource,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct MarketCalls {
    markets: usize,
    detail: usize,
    simple_price: Vec<Vec<String>>,
    chart: usize,
}

/// Aggregator double; clones share their call log
#[derive(Clone, Default)]
pub struct FakeMarketData {
    entries: Vec<RawMarketEntry>,
    details: HashMap<String, RawCoinDetail>,
    prices: HashMap<String, f64>,
    chart: Vec<PricePoint>,
    unavailable: bool,
    calls: Arc<Mutex<MarketCalls>>,
}

impl FakeMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(mut self, entries: Vec<RawMarketEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_detail(mut self, detail: RawCoinDetail) -> Self {
        self.details.insert(detail.id.clone(), detail);
        self
    }

    pub fn with_price(mut self, coin_id: &str, price: f64) -> Self {
        self.prices.insert(coin_id.to_string(), price);
        self
    }

    pub fn with_chart(mut self, chart: Vec<PricePoint>) -> Self {
        self.chart = chart;
        self
    }

    /// Every call fails as if the aggregator were down
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn total_calls(&self) -> usize {
        let calls = self.calls.lock();
        calls.markets + calls.detail + calls.simple_price.len() + calls.chart
    }

    pub fn simple_price_calls(&self) -> usize {
        self.calls.lock().simple_price.len()
    }

    pub fn simple_price_requests(&self) -> Vec<Vec<String>> {
        self.calls.lock().simple_price.clone()
    }

    fn check_available(&self) -> NeoResult<()> {
        if self.unavailable {
            Err(NeoError::upstream(Provider::CoinGecko, "HTTP 503"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MarketDataSource for FakeMarketData {
    async fn coin_markets(&self, _page: u32, per_page: u32) -> NeoResult<Vec<RawMarketEntry>> {
        self.calls.lock().markets += 1;
        self.check_available()?;
        Ok(self.entries.iter().take(per_page as usize).cloned().collect())
    }

    async fn coin_detail(&self, coin_id: &str) -> NeoResult<RawCoinDetail> {
        self.calls.lock().detail += 1;
        self.check_available()?;
        self.details
            .get(coin_id)
            .cloned()
            .ok_or_else(|| NeoError::not_found(format!("coin {}", coin_id)))
    }

    async fn simple_prices(&self, coin_ids: &[String]) -> NeoResult<HashMap<String, f64>> {
        self.calls.lock().simple_price.push(coin_ids.to_vec());
        self.check_available()?;
        Ok(coin_ids
            .iter()
            .filter_map(|id| self.prices.get(id).map(|p| (id.clone(), *p)))
            .collect())
    }

    async fn market_chart(&self, _coin_id: &str, _days: u32) -> NeoResult<Vec<PricePoint>> {
        self.calls.lock().chart += 1;
        self.check_available()?;
        Ok(self.chart.clone())
    }
}

/// Exchange double; unknown pairs fail like an unlisted symbol
#[derive(Clone, Default)]
pub struct FakeTickers {
    tickers: HashMap<String, Ticker24h>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl FakeTickers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(self, symbol: &str, last: &str, open: &str) -> Self {
        self.with_raw_ticker(Ticker24h {
            symbol: symbol.to_string(),
            last_price: Some(serde_json::json!(last)),
            open_price: Some(serde_json::json!(open)),
        })
    }

    pub fn with_raw_ticker(mut self, ticker: Ticker24h) -> Self {
        self.tickers.insert(ticker.symbol.clone(), ticker);
        self
    }

    /// Requests for `symbol` fail as a timeout would
    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl TickerSource for FakeTickers {
    async fn ticker_24h(&self, symbol: &str) -> NeoResult<Ticker24h> {
        self.requested.lock().push(symbol.to_string());

        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(symbol) {
            return Err(NeoError::upstream(
                Provider::Binance,
                "Request failed: operation timed out",
            ));
        }

        self.tickers.get(symbol).cloned().ok_or_else(|| {
            NeoError::upstream(Provider::Binance, format!("API error (400) for {}", symbol))
        })
    }
}
