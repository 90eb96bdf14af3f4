//! Binance integration for the Neo Exchange API
//!
//! Read-only access to the public spot market-data endpoints. Only the 24h
//! rolling ticker is used; it supplies the live price that overrides the
//! aggregator's.

pub mod client;

pub use client::{BinanceClient, BINANCE_API_BASE};
