//! Price reconciliation between the exchange and the aggregator
//!
//! The exchange's live 24h ticker is authoritative whenever it lists the coin
//! against USDT. Otherwise the aggregator's numbers are used: either the quote
//! the caller already holds from a market listing, or a one-off simple-price
//! lookup. Exchange failures never escape this module; they only select the
//! fallback.

use std::sync::Arc;

use neo_core::{MarketDataSource, TickerSource};
use tracing::{debug, instrument};

/// Quote asset appended to a coin symbol to form the exchange pair
pub const QUOTE_ASSET: &str = "USDT";

/// What to use when the exchange cannot price a coin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceFallback {
    /// Aggregator values already fetched with a market listing
    Quote {
        price: Option<f64>,
        change_24h: Option<f64>,
    },
    /// Nothing pre-fetched: ask the aggregator for the spot price only
    Lookup,
}

impl PriceFallback {
    fn change_24h(&self) -> Option<f64> {
        match self {
            PriceFallback::Quote { change_24h, .. } => *change_24h,
            PriceFallback::Lookup => None,
        }
    }
}

/// Result of reconciling one coin
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledPrice {
    pub price: Option<f64>,
    pub change_24h: Option<f64>,
    /// Exchange pair, set only when the exchange supplied the price
    pub exchange_symbol: Option<String>,
}

/// Exchange pair for a coin symbol, `None` for a blank symbol
pub fn exchange_symbol_for(symbol: &str) -> Option<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        None
    } else {
        Some(format!("{}{}", symbol.to_uppercase(), QUOTE_ASSET))
    }
}

/// Chooses the authoritative price and 24h change for a coin
#[derive(Clone)]
pub struct PriceReconciler {
    markets: Arc<dyn MarketDataSource>,
    tickers: Arc<dyn TickerSource>,
}

impl PriceReconciler {
    pub fn new(markets: Arc<dyn MarketDataSource>, tickers: Arc<dyn TickerSource>) -> Self {
        Self { markets, tickers }
    }

    /// Reconcile the price of `coin_id` / `symbol`
    #[instrument(skip(self))]
    pub async fn reconcile(
        &self,
        coin_id: &str,
        symbol: &str,
        fallback: PriceFallback,
    ) -> ReconciledPrice {
        if let Some(pair) = exchange_symbol_for(symbol) {
            match self.tickers.ticker_24h(&pair).await {
                Ok(ticker) => match ticker.quote() {
                    Some(quote) => {
                        return ReconciledPrice {
                            price: Some(quote.last),
                            change_24h: quote.change_pct().or_else(|| fallback.change_24h()),
                            exchange_symbol: Some(pair),
                        };
                    }
                    None => debug!("Unusable ticker for {}, falling back", pair),
                },
                Err(e) => debug!("No exchange price for {}: {}", pair, e),
            }
        }

        match fallback {
            PriceFallback::Quote { price, change_24h } => ReconciledPrice {
                price,
                change_24h,
                exchange_symbol: None,
            },
            PriceFallback::Lookup => ReconciledPrice {
                price: self.lookup_price(coin_id).await,
                change_24h: None,
                exchange_symbol: None,
            },
        }
    }

    async fn lookup_price(&self, coin_id: &str) -> Option<f64> {
        let ids = [coin_id.to_string()];
        match self.markets.simple_prices(&ids).await {
            Ok(prices) => prices.get(coin_id).copied(),
            Err(e) => {
                debug!("Aggregator price lookup failed for {}: {}", coin_id, e);
                None
            }
        }
    }
}
