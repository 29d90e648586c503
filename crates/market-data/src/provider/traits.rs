//! Quote provider trait definition.
//!
//! This module defines the `QuoteProvider` trait that the quote service
//! talks to.

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::models::{RawQuoteResponse, SearchResult};

/// Trait for upstream quote providers.
///
/// Implementations make exactly one upstream call per method and translate
/// every failure into an [`ApiError`]. Reshaping the raw payload is left to
/// the service layer.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockdash_market_data::provider::QuoteProvider;
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl QuoteProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_quote(&self, symbol: &str) -> Result<RawQuoteResponse, ApiError> {
///         Ok(RawQuoteResponse::default())
///     }
///
///     async fn search_symbol(&self, keywords: &str) -> Result<Vec<SearchResult>, ApiError> {
///         Ok(vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote payload for a symbol.
    ///
    /// Returns the provider payload unmodified on success.
    async fn fetch_quote(&self, symbol: &str) -> Result<RawQuoteResponse, ApiError>;

    /// Search for symbols matching free-text keywords.
    ///
    /// An empty result set is `Ok(vec![])`, not an error.
    async fn search_symbol(&self, keywords: &str) -> Result<Vec<SearchResult>, ApiError>;
}
