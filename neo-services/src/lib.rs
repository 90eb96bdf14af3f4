//! Business logic services for the Neo Exchange API
//!
//! Price reconciliation between the exchange and the aggregator, normalization
//! of aggregator payloads, and the portfolio store with its SQLite repository.

pub mod market_service;
pub mod normalizer;
pub mod portfolio_store;
pub mod reconciler;
pub mod repository;
pub mod sqlite_repository;

#[cfg(test)]
mod test_support;

pub use market_service::{
    MarketService, DEFAULT_HISTORY_DAYS, DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_HISTORY_DAYS,
    MAX_PER_PAGE,
};
pub use normalizer::{normalize_coin_detail, normalize_market_page, DEFAULT_RECONCILE_CONCURRENCY};
pub use portfolio_store::{NewHolding, NewTransaction, PortfolioStore, PORTFOLIO_ID_LEN};
pub use reconciler::{exchange_symbol_for, PriceFallback, PriceReconciler, ReconciledPrice, QUOTE_ASSET};
pub use repository::{ArrayEntry, PortfolioRepository, SortKey, SortOrder};
pub use sqlite_repository::SqlitePortfolioRepository;
