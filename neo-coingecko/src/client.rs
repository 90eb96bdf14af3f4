//! CoinGecko API client
//!
//! Provides the four aggregator endpoints the API depends on and implements
//! [`MarketDataSource`] over them.

use crate::types::{usd_prices, MarketChartResponse, SimplePriceResponse, VS_CURRENCY};
use async_trait::async_trait;
use neo_core::{
    MarketDataSource, NeoError, NeoResult, PricePoint, Provider, RawCoinDetail, RawMarketEntry,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// CoinGecko API client
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Create a client against `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> NeoResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("NeoExchange/1.0")
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

    /// Issue a GET and decode the JSON body
    ///
    /// A 404 becomes `NotFound`; every other failure is reported against CoinGecko.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> NeoResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching CoinGecko {} with {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| NeoError::upstream(Provider::CoinGecko, format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(NeoError::not_found(format!("CoinGecko resource: {}", path)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NeoError::upstream(
                Provider::CoinGecko,
                format!("API error ({}): {}", status, truncate(&body, 200)),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            NeoError::upstream(Provider::CoinGecko, format!("Failed to parse response: {}", e))
        })
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    #[instrument(skip(self))]
    async fn coin_markets(&self, page: u32, per_page: u32) -> NeoResult<Vec<RawMarketEntry>> {
        self.get_json(
            "/coins/markets",
            &[
                ("vs_currency", VS_CURRENCY.to_string()),
                ("order", "market_cap_desc".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
                ("sparkline", "false".to_string()),
                ("price_change_percentage", "24h".to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn coin_detail(&self, coin_id: &str) -> NeoResult<RawCoinDetail> {
        self.get_json(
            &format!("/coins/{}", coin_id),
            &[("localization", "false".to_string())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn simple_prices(&self, coin_ids: &[String]) -> NeoResult<HashMap<String, f64>> {
        if coin_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let response: SimplePriceResponse = self
            .get_json(
                "/simple/price",
                &[
                    ("ids", coin_ids.join(",")),
                    ("vs_currencies", VS_CURRENCY.to_string()),
                ],
            )
            .await?;

        Ok(usd_prices(response))
    }

    #[instrument(skip(self))]
    async fn market_chart(&self, coin_id: &str, days: u32) -> NeoResult<Vec<PricePoint>> {
        let response: MarketChartResponse = self
            .get_json(
                &format!("/coins/{}/market_chart", coin_id),
                &[
                    ("vs_currency", VS_CURRENCY.to_string()),
                    ("days", days.to_string()),
                ],
            )
            .await?;

        Ok(response.into_points())
    }
}

impl std::fmt::Debug for CoinGeckoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinGeckoClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
