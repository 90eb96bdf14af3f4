//! Raw upstream payloads
//!
//! These mirror the fields the API reads from the aggregator and the exchange.
//! Everything else in the upstream JSON is ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entry of the aggregator's `/coins/markets` listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMarketEntry {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Logo URLs keyed by size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSizes {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

/// Payload of the aggregator's `/coins/{id}` endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoinDetail {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: ImageSizes,
    /// Description per locale ("en", "de", ...)
    #[serde(default)]
    pub description: HashMap<String, Option<String>>,
    #[serde(default)]
    pub links: Option<serde_json::Value>,
}

impl RawCoinDetail {
    /// English description, empty when missing
    pub fn english_description(&self) -> String {
        self.description
            .get("en")
            .cloned()
            .flatten()
            .unwrap_or_default()
    }
}

/// Exchange 24h rolling-window ticker
///
/// The exchange encodes prices as decimal strings; numbers are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub last_price: Option<serde_json::Value>,
    #[serde(default)]
    pub open_price: Option<serde_json::Value>,
}

/// Parsed prices of a ticker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerQuote {
    pub last: f64,
    /// Zero when the exchange did not report an open price
    pub open: f64,
}

impl TickerQuote {
    /// Percent change from open to last, unless open is zero
    pub fn change_pct(&self) -> Option<f64> {
        if self.open == 0.0 {
            None
        } else {
            Some((self.last - self.open) / self.open * 100.0)
        }
    }
}

impl Ticker24h {
    /// Parse the last and open prices
    ///
    /// Returns `None` when the last price is missing or either field is present
    /// but not a finite number.
    pub fn quote(&self) -> Option<TickerQuote> {
        let last = self.last_price.as_ref().and_then(parse_number)?;
        let open = match &self.open_price {
            None | Some(serde_json::Value::Null) => 0.0,
            Some(value) => parse_number(value)?,
        };
        Some(TickerQuote { last, open })
    }
}

fn parse_number(value: &serde_json::Value) -> Option<f64> {
    let number = match value {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        serde_json::Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}
