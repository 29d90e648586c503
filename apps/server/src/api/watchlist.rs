use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use stockdash_market_data::TickerSymbol;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ApiResponse, WatchlistAction, WatchlistData, WatchlistRequest},
    watchlist::RateDecision,
};

const ANONYMOUS_CLIENT: &str = "anonymous";

/// First `X-Forwarded-For` entry, or `"anonymous"`.
fn client_id(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(ANONYMOUS_CLIENT)
        .to_string()
}

fn enforce_rate_limit(state: &AppState, client_id: &str) -> ApiResult<()> {
    match state.watchlist_limiter.check(client_id) {
        RateDecision::Allowed => Ok(()),
        RateDecision::Limited { retry_after } => {
            tracing::debug!("Watchlist rate limit hit for {}", client_id);
            Err(ApiError::RateLimited {
                retry_after: Some(retry_after),
            })
        }
    }
}

fn parse_request(body: &[u8]) -> ApiResult<WatchlistRequest> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::invalid_symbol("Invalid JSON body"))?;

    // Non-object JSON carries neither field
    if !value.is_object() {
        return Ok(WatchlistRequest::default());
    }
    serde_json::from_value(value).map_err(|_| ApiError::invalid_symbol("Invalid JSON body"))
}

fn parse_symbol(value: Option<&serde_json::Value>) -> Option<TickerSymbol> {
    TickerSymbol::parse(value?.as_str()?).ok()
}

async fn get_watchlist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<WatchlistData>>> {
    let client = client_id(&headers);
    enforce_rate_limit(&state, &client)?;

    let watchlist = state.watchlist_store.list(&client);
    Ok(Json(ApiResponse::ok(WatchlistData { watchlist })))
}

async fn update_watchlist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<WatchlistData>>> {
    let client = client_id(&headers);
    enforce_rate_limit(&state, &client)?;

    let request = parse_request(&body)?;

    let action = WatchlistAction::parse(request.action.as_ref())
        .ok_or_else(|| ApiError::invalid_symbol("'action' must be 'add' or 'remove'"))?;
    let symbol = parse_symbol(request.symbol.as_ref())
        .ok_or_else(|| ApiError::invalid_symbol("Invalid ticker symbol"))?;

    let watchlist = match action {
        WatchlistAction::Add => state.watchlist_store.add(&client, &symbol),
        WatchlistAction::Remove => state.watchlist_store.remove(&client, &symbol),
    };

    Ok(Json(ApiResponse::ok(WatchlistData { watchlist })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/watchlist", get(get_watchlist).post(update_watchlist))
}
