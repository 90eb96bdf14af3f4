//! Binance API client
//!
//! Provides the 24h ticker endpoint and implements [`TickerSource`] over it.

use async_trait::async_trait;
use neo_core::{NeoError, NeoResult, Provider, Ticker24h, TickerSource};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Base URL for the Binance spot API
pub const BINANCE_API_BASE: &str = "https://api.binance.com";

/// Binance API client
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    /// Create a client against `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> NeoResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NeoError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TickerSource for BinanceClient {
    #[instrument(skip(self))]
    async fn ticker_24h(&self, symbol: &str) -> NeoResult<Ticker24h> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);

        debug!("Fetching Binance 24h ticker: {}", symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| NeoError::upstream(Provider::Binance, format!("Request failed: {}", e)))?;

        // Unlisted pairs come back as 400 with {"code": -1121, ...}
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NeoError::upstream(
                Provider::Binance,
                format!("API error ({}) for {}: {}", status, symbol, body),
            ));
        }

        response.json::<Ticker24h>().await.map_err(|e| {
            NeoError::upstream(
                Provider::Binance,
                format!("Failed to parse ticker for {}: {}", symbol, e),
            )
        })
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
