//! Market data models
//!
//! This module contains the data types shared by the provider and service layers:
//! - `quote` - Canonical quote returned to callers (Quote)
//! - `raw` - Provider GLOBAL_QUOTE payload (RawQuoteResponse, GlobalQuote)
//! - `search` - Search data (SearchResult, Stock)

mod quote;
mod raw;
mod search;

pub use quote::Quote;
pub use raw::{GlobalQuote, RawQuoteResponse};
pub use search::{SearchResult, Stock};
