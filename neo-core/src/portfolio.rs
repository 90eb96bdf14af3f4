//! Portfolio documents and valuation structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Maximum number of transactions included in a summary
pub const SUMMARY_TRANSACTION_LIMIT: usize = 20;

/// Direction of a recorded transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

/// A lot of a coin held in a portfolio
///
/// Several holdings may share a `coin_id`; they are kept as separate lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Aggregator coin id, e.g. "bitcoin"
    pub coin_id: String,
    /// Ticker symbol, e.g. "btc"
    pub symbol: String,
    /// Units held (never negative)
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// A deposit or withdrawal recorded against a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub coin_id: String,
    pub symbol: String,
    pub amount: f64,
    #[serde(default)]
    pub tx_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A named collection of holdings and transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    /// Optional public wallet address for display
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Portfolio {
    /// Create an empty portfolio stamped with the current time
    pub fn new(id: String, name: String, address: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            address,
            holdings: Vec::new(),
            transactions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Distinct coin ids across all holdings, in first-seen order
    pub fn distinct_coin_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for holding in &self.holdings {
            if !holding.coin_id.is_empty() && !ids.contains(&holding.coin_id) {
                ids.push(holding.coin_id.clone());
            }
        }
        ids
    }

    pub fn listing(&self) -> PortfolioListing {
        PortfolioListing {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
        }
    }
}

/// Identity fields of a portfolio, used by the list and create endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioListing {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
}

/// A holding priced at the current market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub coin_id: String,
    pub symbol: String,
    pub amount: f64,
    pub price: f64,
    pub value: f64,
}

impl HoldingValuation {
    pub fn new(holding: &Holding, price: f64) -> Self {
        Self {
            coin_id: holding.coin_id.clone(),
            symbol: holding.symbol.clone(),
            amount: holding.amount,
            price,
            value: holding.amount * price,
        }
    }
}

/// Valuation of a portfolio plus its most recent activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub holdings: Vec<HoldingValuation>,
    pub transactions: Vec<Transaction>,
}

impl PortfolioSummary {
    /// Value every holding with `prices` (coin id -> USD); unpriced coins count as 0
    pub fn from_portfolio(portfolio: &Portfolio, prices: &HashMap<String, f64>) -> Self {
        let holdings: Vec<HoldingValuation> = portfolio
            .holdings
            .iter()
            .map(|h| HoldingValuation::new(h, prices.get(&h.coin_id).copied().unwrap_or(0.0)))
            .collect();

        let total_value = holdings.iter().map(|h| h.value).sum();

        let mut transactions = portfolio.transactions.clone();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        transactions.truncate(SUMMARY_TRANSACTION_LIMIT);

        Self {
            total_value,
            holdings,
            transactions,
        }
    }
}
