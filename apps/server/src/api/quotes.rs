use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use stockdash_market_data::{ticker, Quote, QuoteServiceTrait, Stock, TickerSymbol};
use tokio::task;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::ApiResponse,
};

const QUOTE_CACHE_CONTROL: &str = "public, s-maxage=10, stale-while-revalidate=30";

#[derive(Deserialize)]
struct QuotesQuery {
    symbols: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    keywords: Option<String>,
}

async fn get_quote(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Response> {
    let Path(symbol) = path?;
    let symbol = ticker::validate(&symbol)?;

    // A panic in the service comes back as a JoinError
    let service = state.quote_service.clone();
    let quote = task::spawn(async move { service.get_quote(symbol.as_str()).await }).await??;

    Ok((
        [(header::CACHE_CONTROL, QUOTE_CACHE_CONTROL)],
        Json(ApiResponse::ok(quote)),
    )
        .into_response())
}

/// Validate a comma-separated symbol list, dropping duplicates but keeping order.
fn parse_symbol_list(raw: &str, max: usize) -> ApiResult<Vec<TickerSymbol>> {
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();

    for part in raw.split(',') {
        let symbol = ticker::validate(part)?;
        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }

    if symbols.len() > max {
        return Err(ApiError::invalid_symbol(format!(
            "Too many symbols: at most {} per request",
            max
        )));
    }

    Ok(symbols)
}

async fn get_quotes(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QuotesQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<Quote>>>> {
    let Query(query) = query?;
    let symbols = parse_symbol_list(
        query.symbols.as_deref().unwrap_or_default(),
        state.max_symbols_per_request,
    )?;
    let symbols: Vec<String> = symbols.into_iter().map(String::from).collect();

    let service = state.quote_service.clone();
    let quotes = task::spawn(async move { service.get_multiple_quotes(&symbols).await }).await??;

    Ok(Json(ApiResponse::ok(quotes)))
}

async fn search_stocks(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<Stock>>>> {
    let Query(query) = query?;
    let keywords = query
        .keywords
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::invalid_symbol("Search keywords are required"))?
        .to_string();

    let service = state.quote_service.clone();
    let stocks = task::spawn(async move { service.search_stocks(&keywords).await }).await??;

    Ok(Json(ApiResponse::ok(stocks)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks/quote/{symbol}", get(get_quote))
        .route("/stocks/quotes", get(get_quotes))
        .route("/stocks/search", get(search_stocks))
}
