//! Quote normalization service.
//!
//! [`StockService`] sits between the HTTP layer and a [`QuoteProvider`]:
//! it reshapes provider payloads into canonical [`Quote`]s, paces
//! multi-symbol fetches with a [`BatchPolicy`], and aggregates partial
//! failures.

mod batch;
mod transform;

pub use batch::BatchPolicy;

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinError;

use crate::errors::ApiError;
use crate::models::{Quote, Stock};
use crate::provider::QuoteProvider;

/// Operations exposed to the HTTP layer.
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Fetch and normalize the latest quote for one symbol.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ApiError>;

    /// Fetch quotes for many symbols in paced batches.
    ///
    /// Returns whatever succeeded, in input order. Fails only when every
    /// symbol failed.
    async fn get_multiple_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, ApiError>;

    /// Keyword search. Prices in the result are always zero.
    async fn search_stocks(&self, keywords: &str) -> Result<Vec<Stock>, ApiError>;
}

/// One failed symbol in an aggregate error.
#[derive(Debug, Serialize)]
struct SymbolFailure {
    symbol: String,
    error: ApiError,
}

pub struct StockService {
    provider: Arc<dyn QuoteProvider>,
    policy: BatchPolicy,
}

impl StockService {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self::with_policy(provider, BatchPolicy::default())
    }

    pub fn with_policy(provider: Arc<dyn QuoteProvider>, policy: BatchPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    /// Run one provider fetch plus normalization on its own task so a
    /// panicking provider cannot take the caller down with it.
    fn spawn_quote(&self, symbol: String) -> tokio::task::JoinHandle<Result<Quote, ApiError>> {
        let provider = Arc::clone(&self.provider);
        tokio::spawn(async move {
            let response = provider.fetch_quote(&symbol).await?;
            transform::to_quote(response, &symbol)
        })
    }
}

#[async_trait]
impl QuoteServiceTrait for StockService {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ApiError> {
        debug!("Fetching quote for {} from {}", symbol, self.provider.id());

        self.spawn_quote(symbol.to_string())
            .await
            .unwrap_or_else(|e| {
                Err(ApiError::unknown("Failed to fetch stock quote")
                    .with_details(json!({ "originalError": join_error_message(e) })))
            })
    }

    async fn get_multiple_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, ApiError> {
        let mut quotes = Vec::with_capacity(symbols.len());
        let mut failures: Vec<SymbolFailure> = Vec::new();

        let batch_count = self.policy.batch_count(symbols.len());

        for (index, batch) in symbols.chunks(self.policy.chunk_size()).enumerate() {
            debug!(
                "Fetching quote batch {}/{} ({} symbols)",
                index + 1,
                batch_count,
                batch.len()
            );

            let handles: Vec<_> = batch
                .iter()
                .map(|symbol| self.spawn_quote(symbol.clone()))
                .collect();

            let results = join_all(handles).await;

            for (symbol, result) in batch.iter().zip(results) {
                let outcome = result.unwrap_or_else(|e| Err(ApiError::unknown(join_error_message(e))));
                match outcome {
                    Ok(quote) => quotes.push(quote),
                    Err(error) => failures.push(SymbolFailure {
                        symbol: symbol.clone(),
                        error,
                    }),
                }
            }

            // Pace the provider between batches, never after the last
            if index + 1 < batch_count {
                tokio::time::sleep(self.policy.batch_delay).await;
            }
        }

        if failures.is_empty() {
            return Ok(quotes);
        }

        if quotes.is_empty() {
            return Err(ApiError::unknown("Failed to fetch any stock quotes")
                .with_details(json!({ "errors": failures })));
        }

        warn!(
            "Failed to fetch quotes for {} of {} symbols from {}: {:?}",
            failures.len(),
            symbols.len(),
            self.provider.id(),
            failures
                .iter()
                .map(|f| (f.symbol.as_str(), f.error.message.as_str()))
                .collect::<Vec<_>>()
        );

        Ok(quotes)
    }

    async fn search_stocks(&self, keywords: &str) -> Result<Vec<Stock>, ApiError> {
        let provider = Arc::clone(&self.provider);
        let keywords = keywords.to_string();

        let results = tokio::spawn(async move { provider.search_symbol(&keywords).await })
            .await
            .unwrap_or_else(|e| {
                Err(ApiError::unknown("Failed to search stocks")
                    .with_details(json!({ "originalError": join_error_message(e) })))
            })?;

        Ok(results.into_iter().map(Stock::from).collect())
    }
}

/// Text for a task that panicked or was cancelled.
fn join_error_message(err: JoinError) -> String {
    if err.is_cancelled() {
        return "Task was cancelled".to_string();
    }
    panic_message(err.into_panic())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Unknown error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_join_error_message_from_panic() {
        let err = tokio::spawn(async { panic!("provider exploded") })
            .await
            .unwrap_err();
        assert_eq!(join_error_message(err), "provider exploded");
    }

    #[tokio::test]
    async fn test_join_error_message_from_formatted_panic() {
        let symbol = "AAPL";
        let err = tokio::spawn(async move { panic!("bad symbol {}", symbol) })
            .await
            .unwrap_err();
        assert_eq!(join_error_message(err), "bad symbol AAPL");
    }

    #[tokio::test]
    async fn test_join_error_message_from_abort() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        handle.abort();
        let err = handle.await.unwrap_err();
        assert_eq!(join_error_message(err), "Task was cancelled");
    }
}
