//! Stockdash Market Data Crate
//!
//! This crate fetches stock quotes from a rate-limited upstream provider
//! and normalizes them into a stable shape for the Stockdash API.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Ticker validation and normalization
//! - Latest quotes and symbol search via Alpha Vantage
//! - Batched multi-symbol fetching paced to the provider's rate limit
//! - A closed error taxonomy shared with the HTTP layer
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! | Ticker Validator |  (trim, upper-case, 1-5 letters)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |   StockService   | --> |   BatchPolicy    |  (batch size, delay)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |  QuoteProvider   |  (AlphaVantageClient)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | RawQuoteResponse |  (provider payload)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |      Quote       |  (canonical record)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`TickerSymbol`] - A validated ticker
//! - [`Quote`] - Canonical quote record
//! - [`Stock`] - Search summary record
//! - [`ApiError`] / [`ErrorKind`] - Error returned by every quote operation
//! - [`StockService`] - Normalization and batching over a [`QuoteProvider`]

pub mod errors;
pub mod models;
pub mod provider;
pub mod service;
pub mod ticker;

pub use errors::{ApiError, ClientError, ErrorKind};
pub use models::{GlobalQuote, Quote, RawQuoteResponse, SearchResult, Stock};
pub use provider::{AlphaVantageClient, QuoteProvider};
pub use service::{BatchPolicy, QuoteServiceTrait, StockService};
pub use ticker::{is_valid_ticker, normalize, validate, TickerError, TickerSymbol};
