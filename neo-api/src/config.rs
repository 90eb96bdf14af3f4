//! Server configuration

use neo_binance::BINANCE_API_BASE;
use neo_coingecko::COINGECKO_API_BASE;
use neo_services::DEFAULT_RECONCILE_CONCURRENCY;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration for the API server
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub port: u16,
    pub coingecko_base_url: String,
    pub binance_base_url: String,
    pub coingecko_timeout: Duration,
    pub binance_timeout: Duration,
    /// SQLite file holding portfolio documents
    pub portfolio_db_path: PathBuf,
    /// Rows of a market page reconciled at once
    pub ticker_concurrency: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            coingecko_base_url: COINGECKO_API_BASE.to_string(),
            binance_base_url: BINANCE_API_BASE.to_string(),
            coingecko_timeout: Duration::from_secs(15),
            binance_timeout: Duration::from_secs(5),
            portfolio_db_path: PathBuf::from("data/portfolio.db"),
            ticker_concurrency: DEFAULT_RECONCILE_CONCURRENCY,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    ///
    /// Every variable is optional:
    /// - SERVER_PORT
    /// - COINGECKO_BASE_URL, COINGECKO_TIMEOUT_SECS
    /// - BINANCE_BASE_URL, BINANCE_TIMEOUT_SECS
    /// - PORTFOLIO_DB_PATH
    /// - TICKER_CONCURRENCY
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            port: parse_var(&var, "SERVER_PORT")?.unwrap_or(defaults.port),
            coingecko_base_url: var("COINGECKO_BASE_URL").unwrap_or(defaults.coingecko_base_url),
            binance_base_url: var("BINANCE_BASE_URL").unwrap_or(defaults.binance_base_url),
            coingecko_timeout: parse_var(&var, "COINGECKO_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.coingecko_timeout),
            binance_timeout: parse_var(&var, "BINANCE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.binance_timeout),
            portfolio_db_path: var("PORTFOLIO_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.portfolio_db_path),
            ticker_concurrency: parse_var(&var, "TICKER_CONCURRENCY")?
                .unwrap_or(defaults.ticker_concurrency),
        };

        if config.ticker_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "TICKER_CONCURRENCY".to_string(),
                value: "0".to_string(),
                error: "must be at least 1".to_string(),
            });
        }

        Ok(config)
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key: key.to_string(),
                value: raw.clone(),
                error: e.to_string(),
            }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {error}")]
    Invalid {
        key: String,
        value: String,
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.port, 3001);
        assert_eq!(config.coingecko_base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.binance_base_url, "https://api.binance.com");
        assert_eq!(config.binance_timeout, Duration::from_secs(5));
        assert_eq!(config.coingecko_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SERVER_PORT", "8080"),
            ("BINANCE_BASE_URL", "http://localhost:9000"),
            ("BINANCE_TIMEOUT_SECS", "2"),
            ("PORTFOLIO_DB_PATH", "/tmp/p.db"),
            ("TICKER_CONCURRENCY", "4"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.binance_base_url, "http://localhost:9000");
        assert_eq!(config.binance_timeout, Duration::from_secs(2));
        assert_eq!(config.portfolio_db_path, PathBuf::from("/tmp/p.db"));
        assert_eq!(config.ticker_concurrency, 4);
        assert_eq!(config.coingecko_base_url, COINGECKO_API_BASE);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("SERVER_PORT", "  "), ("COINGECKO_BASE_URL", "")]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.coingecko_base_url, COINGECKO_API_BASE);
    }

    #[test]
    fn test_unparseable_values_rejected() {
        let err = load(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));

        assert!(load(&[("COINGECKO_TIMEOUT_SECS", "-1")]).is_err());
        assert!(load(&[("TICKER_CONCURRENCY", "0")]).is_err());
    }
}
