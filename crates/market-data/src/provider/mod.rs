//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all providers implement
//! - The Alpha Vantage implementation
//!
//! Providers only fetch and classify errors. Turning a raw payload into a
//! canonical [`Quote`](crate::models::Quote) happens in the service layer.

mod traits;

pub mod alpha_vantage;

// Re-exports
pub use alpha_vantage::AlphaVantageClient;
pub use traits::QuoteProvider;
