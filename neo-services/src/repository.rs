//! Document repository interface for portfolios

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neo_core::{Holding, NeoResult, Portfolio, Transaction};
use serde_json::Value;

/// An element appended to one of a portfolio's arrays
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayEntry {
    Holding(Holding),
    Transaction(Transaction),
}

impl ArrayEntry {
    /// Name of the document array this entry belongs to
    pub fn field(&self) -> &'static str {
        match self {
            ArrayEntry::Holding(_) => "holdings",
            ArrayEntry::Transaction(_) => "transactions",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            ArrayEntry::Holding(h) => serde_json::to_value(h),
            ArrayEntry::Transaction(t) => serde_json::to_value(t),
        }
    }
}

/// Document timestamp to order listings by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Storage for portfolio documents
///
/// Portfolios are never deleted. Appends must be a single atomic update of the
/// stored document.
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    /// Insert a new document
    async fn create(&self, portfolio: &Portfolio) -> NeoResult<()>;

    async fn find_by_id(&self, id: &str) -> NeoResult<Option<Portfolio>>;

    /// Append `entry` to its array and stamp `updated_at`
    ///
    /// Returns `false` when no document has this id.
    async fn append_to_array_field(
        &self,
        id: &str,
        entry: ArrayEntry,
        updated_at: DateTime<Utc>,
    ) -> NeoResult<bool>;

    async fn list_sorted_by(&self, key: SortKey, order: SortOrder) -> NeoResult<Vec<Portfolio>>;
}
