//! Error types for the market data crate.
//!
//! This module provides:
//! - [`ErrorKind`]: The closed set of error codes surfaced to API callers
//! - [`ApiError`]: The error value returned by every quote operation
//! - [`ClientError`]: Failures while constructing a provider client

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::ticker::TickerError;

/// Error codes exposed to API callers.
///
/// Serialized in SCREAMING_SNAKE_CASE, e.g. `"API_LIMIT_EXCEEDED"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The symbol failed validation or the provider has no data for it.
    InvalidSymbol,

    /// The provider's call frequency limit was hit.
    ApiLimitExceeded,

    /// The provider rejected the API key.
    InvalidApiKey,

    /// Transport failure, timeout, non-2xx status, or an unreadable body.
    NetworkError,

    /// Anything that does not fit the kinds above.
    UnknownError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidSymbol => "INVALID_SYMBOL",
            ErrorKind::ApiLimitExceeded => "API_LIMIT_EXCEEDED",
            ErrorKind::InvalidApiKey => "INVALID_API_KEY",
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified error from a quote operation.
///
/// Once created, an `ApiError` is passed through every layer unchanged;
/// only the HTTP boundary decides how to present it.
///
/// # Examples
///
/// ```
/// use stockdash_market_data::errors::{ApiError, ErrorKind};
///
/// let error = ApiError::invalid_symbol("No data found for symbol: XYZ");
/// assert_eq!(error.code, ErrorKind::InvalidSymbol);
/// assert_eq!(error.to_string(), "No data found for symbol: XYZ");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(code: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_symbol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSymbol, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownError, message)
    }

    /// A `NETWORK_ERROR` carrying the underlying failure as `originalError`.
    pub fn network(cause: impl fmt::Display) -> Self {
        let text = cause.to_string();
        Self::new(ErrorKind::NetworkError, text.clone())
            .with_details(json!({ "originalError": text }))
    }

    /// The provider's rate-limit notice, kept verbatim under `note`.
    pub fn rate_limited(note: impl Into<String>) -> Self {
        Self::new(ErrorKind::ApiLimitExceeded, "API call frequency limit exceeded")
            .with_details(json!({ "note": note.into() }))
    }
}

impl From<TickerError> for ApiError {
    fn from(err: TickerError) -> Self {
        ApiError::invalid_symbol(err.to_string())
    }
}

/// Errors raised while building a provider client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No key was passed and `ALPHA_VANTAGE_API_KEY` is unset or empty.
    #[error("Alpha Vantage API key is required")]
    MissingApiKey,

    /// The underlying HTTP client could not be created.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
