//! Market service: listing, coin detail and price history
//!
//! Validates request parameters before touching the network, fetches from the
//! aggregator, and hands the payloads to the normalizers.

use std::sync::Arc;

use neo_core::{CoinDetail, CoinMarketRow, MarketDataSource, NeoError, NeoResult, PricePoint};
use tracing::{info, instrument};

use crate::normalizer::{normalize_coin_detail, normalize_market_page, DEFAULT_RECONCILE_CONCURRENCY};
use crate::reconciler::PriceReconciler;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 30;
pub const MAX_PER_PAGE: i64 = 250;
pub const DEFAULT_HISTORY_DAYS: i64 = 7;
pub const MAX_HISTORY_DAYS: i64 = 365;

/// Service for market listings, coin details and history
#[derive(Clone)]
pub struct MarketService {
    source: Arc<dyn MarketDataSource>,
    reconciler: PriceReconciler,
    concurrency: usize,
}

impl MarketService {
    /// Create a new market service
    pub fn new(source: Arc<dyn MarketDataSource>, reconciler: PriceReconciler) -> Self {
        Self {
            source,
            reconciler,
            concurrency: DEFAULT_RECONCILE_CONCURRENCY,
        }
    }

    /// Limit how many rows of a page are reconciled at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// One page of coins by market cap, with reconciled prices
    #[instrument(skip(self))]
    pub async fn markets(&self, page: i64, per_page: i64) -> NeoResult<Vec<CoinMarketRow>> {
        if page < 1 {
            return Err(NeoError::invalid_input("page must be at least 1"));
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(NeoError::invalid_input(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        let page = u32::try_from(page).map_err(|_| NeoError::invalid_input("page is too large"))?;

        let entries = self.source.coin_markets(page, per_page as u32).await?;
        info!("Fetched {} market entries for page {}", entries.len(), page);

        Ok(normalize_market_page(&self.reconciler, entries, self.concurrency).await)
    }

    /// Detail view of one coin
    #[instrument(skip(self))]
    pub async fn coin(&self, coin_id: &str) -> NeoResult<CoinDetail> {
        validate_coin_id(coin_id)?;

        let raw = self.source.coin_detail(coin_id).await?;
        Ok(normalize_coin_detail(&self.reconciler, raw).await)
    }

    /// USD price series for the last `days` days, as returned upstream
    #[instrument(skip(self))]
    pub async fn price_history(&self, coin_id: &str, days: i64) -> NeoResult<Vec<PricePoint>> {
        validate_coin_id(coin_id)?;
        if !(1..=MAX_HISTORY_DAYS).contains(&days) {
            return Err(NeoError::invalid_input(format!(
                "days must be between 1 and {}",
                MAX_HISTORY_DAYS
            )));
        }

        self.source.market_chart(coin_id, days as u32).await
    }
}

/// Aggregator ids are slugs like "bitcoin" or "usd-coin"
fn validate_coin_id(coin_id: &str) -> NeoResult<()> {
    let valid = !coin_id.is_empty()
        && coin_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(NeoError::invalid_input(format!("Invalid coin id: {:?}", coin_id)))
    }
}
