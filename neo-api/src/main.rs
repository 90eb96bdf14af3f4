//! Neo Exchange API Server
//!
//! HTTP API that prices coins from Binance and CoinGecko and tracks
//! user portfolios.

mod config;
mod routes;

#[cfg(test)]
mod test_support;

use axum::{
    http::{header, Method},
    Router,
};
use neo_binance::BinanceClient;
use neo_coingecko::CoinGeckoClient;
use neo_core::{MarketDataSource, TickerSource};
use neo_services::{MarketService, PortfolioStore, PriceReconciler, SqlitePortfolioRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ApiConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub market_service: Arc<MarketService>,
    pub portfolio_store: Arc<PortfolioStore>,
}

/// Build the router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", routes::api_routes())
        .merge(routes::root_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,neo_api=debug")),
        )
        .init();

    info!("Starting Neo Exchange API");

    let config = ApiConfig::from_env()?;
    info!(
        "Upstreams: CoinGecko at {}, Binance at {}",
        config.coingecko_base_url, config.binance_base_url
    );

    // Initialize clients
    let coingecko: Arc<dyn MarketDataSource> = Arc::new(CoinGeckoClient::new(
        config.coingecko_base_url.clone(),
        config.coingecko_timeout,
    )?);
    let binance: Arc<dyn TickerSource> = Arc::new(BinanceClient::new(
        config.binance_base_url.clone(),
        config.binance_timeout,
    )?);

    // Initialize services
    let reconciler = PriceReconciler::new(coingecko.clone(), binance);
    let market_service = MarketService::new(coingecko.clone(), reconciler)
        .with_concurrency(config.ticker_concurrency);

    info!(
        "Initializing portfolio storage at: {}",
        config.portfolio_db_path.display()
    );
    let repository = SqlitePortfolioRepository::new(&config.portfolio_db_path)?;
    let portfolio_store = PortfolioStore::new(Arc::new(repository), coingecko);

    let state = AppState {
        market_service: Arc::new(market_service),
        portfolio_store: Arc::new(portfolio_store),
    };

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
