//! CoinGecko API response types
//!
//! Only the wire shapes specific to this client live here; the coin list and
//! coin detail payloads deserialize straight into the `neo-core` raw types.

use serde::Deserialize;
use std::collections::HashMap;

use neo_core::PricePoint;

/// Base URL for the public CoinGecko v3 API
pub const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";

/// Quote currency for every request
pub const VS_CURRENCY: &str = "usd";

/// Response of `/simple/price`: coin id -> currency -> price
pub type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

/// Response of `/coins/{id}/market_chart`
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    /// `[timestamp_millis, price]` pairs, oldest first
    #[serde(default)]
    pub prices: Vec<serde_json::Value>,
}

impl MarketChartResponse {
    /// Convert to price points, skipping entries that are not number pairs
    pub fn into_points(self) -> Vec<PricePoint> {
        self.prices
            .into_iter()
            .filter_map(|v| serde_json::from_value::<PricePoint>(v).ok())
            .collect()
    }
}

/// Flatten a simple-price response to coin id -> USD price
///
/// Coins without a USD quote are left out.
pub fn usd_prices(response: SimplePriceResponse) -> HashMap<String, f64> {
    response
        .into_iter()
        .filter_map(|(id, quotes)| quotes.get(VS_CURRENCY).copied().flatten().map(|p| (id, p)))
        .collect()
}
