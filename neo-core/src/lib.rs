//! Core types for the Neo Exchange API
//!
//! This crate defines the shared data structures used across the workspace:
//! the public market and coin shapes, the raw upstream schemas they are
//! normalized from, portfolio documents, and the upstream source traits.

pub mod error;
pub mod market;
pub mod portfolio;
pub mod provider;
pub mod source;
pub mod upstream;

pub use error::{NeoError, NeoResult};
pub use market::{CoinDetail, CoinMarketData, CoinMarketRow, PriceHistory, PricePoint};
pub use portfolio::{
    Holding, HoldingValuation, Portfolio, PortfolioListing, PortfolioSummary, Transaction,
    TransactionKind, SUMMARY_TRANSACTION_LIMIT,
};
pub use provider::Provider;
pub use source::{MarketDataSource, TickerSource};
pub use upstream::{ImageSizes, RawCoinDetail, RawMarketEntry, Ticker24h, TickerQuote};
