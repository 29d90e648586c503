use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use stockdash_market_data::TickerSymbol;

/// Per-client watchlist storage.
///
/// Lists keep insertion order and never hold duplicates. Every method
/// returns the client's list after the operation.
pub trait WatchlistStore: Send + Sync {
    fn list(&self, client_id: &str) -> Vec<String>;

    /// Append `symbol` unless it is already present.
    fn add(&self, client_id: &str, symbol: &TickerSymbol) -> Vec<String>;

    /// Remove `symbol` if present.
    fn remove(&self, client_id: &str, symbol: &TickerSymbol) -> Vec<String>;
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryWatchlistStore {
    lists: Mutex<HashMap<String, Vec<String>>>,
}

impl InMemoryWatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the lists, recovering from poison if necessary.
    fn lock_lists(&self) -> MutexGuard<'_, HashMap<String, Vec<String>>> {
        self.lists.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Watchlist store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl WatchlistStore for InMemoryWatchlistStore {
    fn list(&self, client_id: &str) -> Vec<String> {
        self.lock_lists()
            .get(client_id)
            .cloned()
            .unwrap_or_default()
    }

    fn add(&self, client_id: &str, symbol: &TickerSymbol) -> Vec<String> {
        let mut lists = self.lock_lists();
        let list = lists.entry(client_id.to_string()).or_default();
        if !list.iter().any(|s| s == symbol.as_str()) {
            list.push(symbol.to_string());
        }
        list.clone()
    }

    fn remove(&self, client_id: &str, symbol: &TickerSymbol) -> Vec<String> {
        let mut lists = self.lock_lists();
        let list = lists.entry(client_id.to_string()).or_default();
        list.retain(|s| s != symbol.as_str());
        list.clone()
    }
}
