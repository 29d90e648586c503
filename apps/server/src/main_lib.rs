use std::sync::Arc;

use anyhow::Context;
use stockdash_market_data::{AlphaVantageClient, QuoteProvider, QuoteServiceTrait, StockService};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::watchlist::{FixedWindowLimiter, InMemoryWatchlistStore, WatchlistStore};

pub struct AppState {
    pub quote_service: Arc<dyn QuoteServiceTrait + Send + Sync>,
    pub watchlist_store: Arc<dyn WatchlistStore>,
    pub watchlist_limiter: Arc<FixedWindowLimiter>,
    pub max_symbols_per_request: usize,
}

impl AppState {
    /// State with in-memory watchlist storage around an existing quote service.
    pub fn new(quote_service: Arc<dyn QuoteServiceTrait + Send + Sync>, config: &Config) -> Self {
        Self {
            quote_service,
            watchlist_store: Arc::new(InMemoryWatchlistStore::new()),
            watchlist_limiter: Arc::new(FixedWindowLimiter::new(
                config.watchlist_rate_limit,
                config.watchlist_rate_window,
            )),
            max_symbols_per_request: config.max_symbols_per_request,
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("SD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let client = AlphaVantageClient::new(config.alpha_vantage_api_key.clone())
        .context("Failed to create Alpha Vantage client")?
        .with_base_url(config.alpha_vantage_base_url.clone());
    tracing::info!(
        "Quote provider {} at {} (batch size {}, delay {:?})",
        client.id(),
        client.base_url(),
        config.batch_policy.batch_size,
        config.batch_policy.batch_delay
    );

    let provider: Arc<dyn QuoteProvider> = Arc::new(client);
    let quote_service = Arc::new(StockService::with_policy(provider, config.batch_policy));

    Ok(Arc::new(AppState::new(quote_service, config)))
}
