//! Portfolio Store
//!
//! Creates portfolios, records holdings and transactions against them, and
//! values them with aggregator spot prices. Input is validated before the
//! repository is touched, so a rejected request never mutates a document.

use std::sync::Arc;

use chrono::Utc;
use neo_core::{
    Holding, MarketDataSource, NeoError, NeoResult, Portfolio, PortfolioListing, PortfolioSummary,
    Transaction, TransactionKind,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::repository::{ArrayEntry, PortfolioRepository, SortKey, SortOrder};

/// Length of a server-assigned portfolio id
pub const PORTFOLIO_ID_LEN: usize = 32;

/// Holding as submitted by a client
#[derive(Debug, Clone, Deserialize)]
pub struct NewHolding {
    #[serde(alias = "coinId")]
    pub coin_id: String,
    pub symbol: String,
    pub amount: f64,
}

/// Transaction as submitted by a client; `kind` is still unparsed
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "coinId")]
    pub coin_id: String,
    pub symbol: String,
    pub amount: f64,
    #[serde(default, alias = "txHash")]
    pub tx_hash: Option<String>,
}

/// Portfolio service over a [`PortfolioRepository`]
#[derive(Clone)]
pub struct PortfolioStore {
    repo: Arc<dyn PortfolioRepository>,
    prices: Arc<dyn MarketDataSource>,
}

impl PortfolioStore {
    pub fn new(repo: Arc<dyn PortfolioRepository>, prices: Arc<dyn MarketDataSource>) -> Self {
        Self { repo, prices }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, name: &str, address: Option<&str>) -> NeoResult<PortfolioListing> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NeoError::invalid_input("name must not be empty"));
        }
        let address = address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        let portfolio = Portfolio::new(new_portfolio_id(), name.to_string(), address);
        self.repo.create(&portfolio).await?;

        info!("Created portfolio {}", portfolio.id);
        Ok(portfolio.listing())
    }

    /// All portfolios, newest first
    pub async fn list(&self) -> NeoResult<Vec<PortfolioListing>> {
        let portfolios = self
            .repo
            .list_sorted_by(SortKey::CreatedAt, SortOrder::Descending)
            .await?;
        Ok(portfolios.iter().map(Portfolio::listing).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> NeoResult<Portfolio> {
        check_portfolio_id(id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| NeoError::not_found(format!("portfolio {}", id)))
    }

    #[instrument(skip(self, holding), fields(coin_id = %holding.coin_id))]
    pub async fn add_holding(&self, id: &str, holding: NewHolding) -> NeoResult<Holding> {
        check_portfolio_id(id)?;
        let coin_id = required("coin_id", &holding.coin_id)?;
        check_amount(holding.amount)?;

        let now = Utc::now();
        let holding = Holding {
            coin_id,
            symbol: holding.symbol.trim().to_string(),
            amount: holding.amount,
            created_at: now,
        };

        self.append(id, ArrayEntry::Holding(holding.clone())).await?;
        Ok(holding)
    }

    #[instrument(skip(self, tx), fields(kind = %tx.kind))]
    pub async fn add_transaction(&self, id: &str, tx: NewTransaction) -> NeoResult<Transaction> {
        check_portfolio_id(id)?;
        let kind: TransactionKind = tx.kind.parse().map_err(NeoError::invalid_input)?;
        let coin_id = required("coin_id", &tx.coin_id)?;
        check_amount(tx.amount)?;

        let transaction = Transaction {
            kind,
            coin_id,
            symbol: tx.symbol.trim().to_string(),
            amount: tx.amount,
            tx_hash: tx.tx_hash.filter(|h| !h.trim().is_empty()),
            timestamp: Utc::now(),
        };

        self.append(id, ArrayEntry::Transaction(transaction.clone()))
            .await?;
        Ok(transaction)
    }

    /// Value every holding at current aggregator prices
    #[instrument(skip(self))]
    pub async fn summarize(&self, id: &str) -> NeoResult<PortfolioSummary> {
        let portfolio = self.get(id).await?;

        let coin_ids = portfolio.distinct_coin_ids();
        let prices = if coin_ids.is_empty() {
            Default::default()
        } else {
            self.prices.simple_prices(&coin_ids).await.map_err(|e| {
                warn!("Price lookup for portfolio {} failed: {}", id, e);
                e
            })?
        };

        Ok(PortfolioSummary::from_portfolio(&portfolio, &prices))
    }

    async fn append(&self, id: &str, entry: ArrayEntry) -> NeoResult<()> {
        let field = entry.field();
        if self
            .repo
            .append_to_array_field(id, entry, Utc::now())
            .await?
        {
            info!("Appended to {} of portfolio {}", field, id);
            Ok(())
        } else {
            Err(NeoError::not_found(format!("portfolio {}", id)))
        }
    }
}

fn new_portfolio_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn check_portfolio_id(id: &str) -> NeoResult<()> {
    if id.len() == PORTFOLIO_ID_LEN && id.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(NeoError::malformed_id(id))
    }
}

fn check_amount(amount: f64) -> NeoResult<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(NeoError::invalid_input(format!(
            "amount must be a non-negative number, got {}",
            amount
        )))
    }
}

fn required(field: &str, value: &str) -> NeoResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(NeoError::invalid_input(format!("{} must not be empty", field)))
    } else {
        Ok(value.to_string())
    }
}
