//! CoinGecko integration for the Neo Exchange API
//!
//! This crate provides a client for the public CoinGecko v3 API, which supplies
//! coin metadata, market-cap rankings, spot prices and historical series.
//! No API key is required for the endpoints used here.

pub mod client;
pub mod types;

pub use client::CoinGeckoClient;
pub use types::COINGECKO_API_BASE;
