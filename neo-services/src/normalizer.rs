//! Normalization of aggregator payloads into the public response shapes

use futures::stream::{self, StreamExt};
use neo_core::{CoinDetail, CoinMarketData, CoinMarketRow, RawCoinDetail, RawMarketEntry};
use tracing::{debug, instrument};

use crate::reconciler::{PriceFallback, PriceReconciler};

/// Default number of rows reconciled at once
pub const DEFAULT_RECONCILE_CONCURRENCY: usize = 16;

/// Turn one aggregator market page into market rows
///
/// Output is 1:1 with the input and in the same order. Rows are reconciled
/// concurrently, at most `concurrency` at a time.
#[instrument(skip(reconciler, entries), fields(rows = entries.len()))]
pub async fn normalize_market_page(
    reconciler: &PriceReconciler,
    entries: Vec<RawMarketEntry>,
    concurrency: usize,
) -> Vec<CoinMarketRow> {
    let rows: Vec<CoinMarketRow> = stream::iter(entries)
        .map(|entry| async move {
            let fallback = PriceFallback::Quote {
                price: entry.current_price,
                change_24h: entry.price_change_percentage_24h,
            };
            let reconciled = reconciler.reconcile(&entry.id, &entry.symbol, fallback).await;

            CoinMarketRow {
                id: entry.id,
                symbol: entry.symbol,
                name: entry.name,
                image: entry.image,
                current_price: reconciled.price.or(entry.current_price),
                price_change_percentage_24h: reconciled
                    .change_24h
                    .or(entry.price_change_percentage_24h),
                binance_symbol: reconciled.exchange_symbol,
            }
        })
        // `buffered` yields in input order regardless of completion order
        .buffered(concurrency.max(1))
        .collect()
        .await;

    debug!(
        "Normalized {} rows ({} priced by exchange)",
        rows.len(),
        rows.iter().filter(|r| r.binance_symbol.is_some()).count()
    );
    rows
}

/// Turn an aggregator coin-detail payload into the coin detail view
#[instrument(skip(reconciler, raw), fields(coin_id = %raw.id))]
pub async fn normalize_coin_detail(reconciler: &PriceReconciler, raw: RawCoinDetail) -> CoinDetail {
    let reconciled = reconciler
        .reconcile(&raw.id, &raw.symbol, PriceFallback::Lookup)
        .await;

    let description = raw.english_description();
    let image = raw.image.large.or(raw.image.small);
    let links = raw
        .links
        .filter(|l| !l.is_null())
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

    CoinDetail {
        id: raw.id,
        symbol: raw.symbol,
        name: raw.name,
        image,
        market_data: CoinMarketData {
            current_price: reconciled.price,
            price_change_percentage_24h: reconciled.change_24h,
        },
        links,
        description,
    }
}
