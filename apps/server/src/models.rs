use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use stockdash_market_data::ApiError as QuoteError;

/// Envelope wrapping every API response.
///
/// Exactly one of `data` and `error` is non-null.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<QuoteError>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now_timestamp(),
        }
    }

    pub fn failure(error: QuoteError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            timestamp: now_timestamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WatchlistData {
    pub watchlist: Vec<String>,
}

/// `POST /watchlist` body. Fields are validated by the handler, not serde.
#[derive(Deserialize, Debug, Default)]
pub struct WatchlistRequest {
    pub action: Option<serde_json::Value>,
    pub symbol: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchlistAction {
    Add,
    Remove,
}

impl WatchlistAction {
    pub fn parse(value: Option<&serde_json::Value>) -> Option<Self> {
        match value.and_then(|v| v.as_str()) {
            Some("add") => Some(Self::Add),
            Some("remove") => Some(Self::Remove),
            _ => None,
        }
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
