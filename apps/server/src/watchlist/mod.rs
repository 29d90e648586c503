//! Watchlist storage and per-client rate limiting.

mod rate_limit;
mod store;

pub use rate_limit::{FixedWindowLimiter, RateDecision};
pub use store::{InMemoryWatchlistStore, WatchlistStore};
