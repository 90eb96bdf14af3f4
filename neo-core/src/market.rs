//! Public market data structures returned by the API

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One row of the markets listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMarketRow {
    /// Aggregator coin id (e.g., "bitcoin")
    pub id: String,

    /// Ticker symbol as the aggregator spells it (e.g., "btc")
    pub symbol: String,

    /// Human-readable name
    pub name: String,

    /// Thumbnail URL
    pub image: Option<String>,

    /// Current USD price
    pub current_price: Option<f64>,

    /// 24h price change in percent
    pub price_change_percentage_24h: Option<f64>,

    /// Exchange pair the price came from, when the exchange supplied it
    pub binance_symbol: Option<String>,
}

/// Price fields of a coin detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMarketData {
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
}

/// Detail view of a single coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,

    /// Large logo URL
    pub image: Option<String>,

    pub market_data: CoinMarketData,

    /// Aggregator link map (homepage, explorers, repos...), passed through
    pub links: serde_json::Value,

    /// English description, empty when the aggregator has none
    pub description: String,
}

/// A single point of a historical USD price series
///
/// Serialized as `[timestamp_millis, price_usd]`, the shape the aggregator
/// returns and the frontend charts consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_millis: i64,
    pub price_usd: f64,
}

impl PricePoint {
    pub fn new(timestamp_millis: i64, price_usd: f64) -> Self {
        Self {
            timestamp_millis,
            price_usd,
        }
    }
}

impl Serialize for PricePoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.timestamp_millis, self.price_usd).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PricePoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Upstream timestamps are integral but arrive as JSON numbers of either kind
        let (timestamp, price): (f64, f64) = Deserialize::deserialize(deserializer)?;
        Ok(Self::new(timestamp as i64, price))
    }
}

/// Response body for the history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub prices: Vec<PricePoint>,
}
