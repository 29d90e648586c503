//! Alpha Vantage quote provider implementation.
//!
//! This module talks to the Alpha Vantage query API:
//! - Latest quotes via the GLOBAL_QUOTE function
//! - Symbol lookup via the SYMBOL_SEARCH function
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute.
//! Pacing is the caller's job, see [`crate::service::BatchPolicy`].

mod models;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;

use crate::errors::{ApiError, ClientError};
use crate::models::{RawQuoteResponse, SearchResult};
use crate::provider::QuoteProvider;

use models::SymbolSearchResponse;

pub const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Environment variable consulted when no key is passed to [`AlphaVantageClient::new`].
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Per-request deadline; an expired request is cancelled.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Alpha Vantage client.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for AlphaVantageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client.
    ///
    /// Uses `api_key` when given, otherwise `ALPHA_VANTAGE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingApiKey`] if neither source yields a
    /// non-empty key, or [`ClientError::HttpClient`] if the HTTP client
    /// cannot be created.
    pub fn new(api_key: Option<String>) -> Result<Self, ClientError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
            .ok_or(ClientError::MissingApiKey)?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different query endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reuse an existing HTTP client. The 10 second deadline is still
    /// applied per request.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn redact(&self, text: &str) -> String {
        text.replace(&self.api_key, "***")
    }

    /// Make a request to the Alpha Vantage API and return the body text.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, ApiError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        let url = reqwest::Url::parse_with_params(&self.base_url, &all_params)
            .map_err(|e| ApiError::network(format!("Failed to build URL: {}", e)))?;

        debug!("Alpha Vantage request: {}", self.redact(url.as_str()));

        let response = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::network(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }

        response.text().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            return ApiError::network(format!(
                "Request to {} timed out after {}s",
                PROVIDER_ID,
                REQUEST_TIMEOUT.as_secs()
            ));
        }
        ApiError::network(self.redact(&err.to_string()))
    }

    /// Check for API-level errors in a quote response.
    fn check_api_error(
        error_message: &Option<String>,
        note: &Option<String>,
        information: &Option<String>,
    ) -> Result<(), ApiError> {
        if let Some(msg) = error_message.as_deref().filter(|m| !m.is_empty()) {
            return Err(ApiError::invalid_symbol(msg));
        }

        // "Note" is how the free tier reports throttling
        if let Some(msg) = note.as_deref().filter(|m| !m.is_empty()) {
            return Err(ApiError::rate_limited(msg));
        }

        // "Information" is used for newer quota notices and for everything else
        if let Some(msg) = information.as_deref().filter(|m| !m.is_empty()) {
            if is_rate_limit_notice(msg) {
                return Err(ApiError::rate_limited(msg));
            }
            warn!("Alpha Vantage info: {}", msg);
        }

        Ok(())
    }
}

fn is_rate_limit_notice(msg: &str) -> bool {
    let lower = msg.to_ascii_lowercase();
    lower.contains("api call frequency") || lower.contains("rate limit")
}

fn is_alphanumeric_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_alphanumeric())
}

#[async_trait]
impl QuoteProvider for AlphaVantageClient {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuoteResponse, ApiError> {
        if !is_alphanumeric_symbol(symbol) {
            return Err(ApiError::invalid_symbol(
                "Symbol must contain only alphanumeric characters",
            ));
        }

        let upper = symbol.to_ascii_uppercase();
        let body = self
            .fetch(&[("function", "GLOBAL_QUOTE"), ("symbol", &upper)])
            .await?;

        let response: RawQuoteResponse =
            serde_json::from_str(&body).map_err(ApiError::network)?;

        Self::check_api_error(
            &response.error_message,
            &response.note,
            &response.information,
        )?;

        match &response.global_quote {
            Some(quote) if !quote.is_empty() => Ok(response),
            _ => Err(ApiError::invalid_symbol(format!(
                "No data found for symbol: {}",
                symbol
            ))),
        }
    }

    async fn search_symbol(&self, keywords: &str) -> Result<Vec<SearchResult>, ApiError> {
        let body = self
            .fetch(&[("function", "SYMBOL_SEARCH"), ("keywords", keywords)])
            .await?;

        let response: SymbolSearchResponse =
            serde_json::from_str(&body).map_err(ApiError::network)?;

        for msg in [&response.error_message, &response.note, &response.information]
            .into_iter()
            .flatten()
        {
            warn!("Alpha Vantage search notice for '{}': {}", keywords, msg);
        }

        Ok(response
            .best_matches
            .unwrap_or_default()
            .into_iter()
            .map(SearchResult::from)
            .collect())
    }
}
