use std::time::Duration;

/// How multi-symbol fetches are paced against the provider.
///
/// Symbols are split into groups of `batch_size`; each group is fetched
/// concurrently and the service sleeps `batch_delay` between groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Symbols fetched concurrently per batch. Never zero.
    pub batch_size: usize,

    /// Pause between consecutive batches. Not applied after the last one.
    pub batch_delay: Duration,
}

impl BatchPolicy {
    /// Create a policy. A `batch_size` of 0 is raised to 1.
    pub fn new(batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// Batch size actually used. A zero `batch_size` set through the public
    /// field counts as 1.
    pub fn chunk_size(&self) -> usize {
        self.batch_size.max(1)
    }

    /// Number of batches needed for `symbol_count` symbols.
    pub fn batch_count(&self, symbol_count: usize) -> usize {
        symbol_count.div_ceil(self.chunk_size())
    }
}

impl Default for BatchPolicy {
    /// Alpha Vantage free tier: 5 calls per minute.
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_delay: Duration::from_secs(12),
        }
    }
}
