//! Upstream data providers

use std::fmt;

/// Upstream services the API aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// CoinGecko - market-data aggregator (metadata, rankings, history)
    CoinGecko,
    /// Binance - exchange supplying live 24h tickers
    Binance,
}

impl Provider {
    /// Get the full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::CoinGecko => "CoinGecko",
            Provider::Binance => "Binance",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
