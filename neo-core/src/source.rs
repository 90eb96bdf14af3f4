//! Upstream source traits
//!
//! The services talk to the aggregator and the exchange only through these,
//! so tests can swap in doubles.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::NeoResult;
use crate::market::PricePoint;
use crate::upstream::{RawCoinDetail, RawMarketEntry, Ticker24h};

/// Market-data aggregator (coin metadata, rankings, history)
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// One page of coins ordered by market cap, descending
    async fn coin_markets(&self, page: u32, per_page: u32) -> NeoResult<Vec<RawMarketEntry>>;

    /// Full detail payload for one coin
    async fn coin_detail(&self, coin_id: &str) -> NeoResult<RawCoinDetail>;

    /// USD prices for many coins in one request; unknown ids are absent
    async fn simple_prices(&self, coin_ids: &[String]) -> NeoResult<HashMap<String, f64>>;

    /// USD price series over the last `days` days
    async fn market_chart(&self, coin_id: &str, days: u32) -> NeoResult<Vec<PricePoint>>;
}

/// Exchange supplying live 24h tickers
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// 24h ticker for a trading pair (e.g., "BTCUSDT")
    async fn ticker_24h(&self, symbol: &str) -> NeoResult<Ticker24h>;
}
