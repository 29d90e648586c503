use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use stockdash_market_data::{provider::alpha_vantage, BatchPolicy};

/// Headroom on top of the slowest multi-quote request.
const TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Falls back to `ALPHA_VANTAGE_API_KEY` inside the client when `None`.
    pub alpha_vantage_api_key: Option<String>,
    pub alpha_vantage_base_url: String,
    pub batch_policy: BatchPolicy,
    pub max_symbols_per_request: usize,
    pub watchlist_rate_limit: u32,
    pub watchlist_rate_window: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let batch_policy = BatchPolicy::default();
        let max_symbols_per_request = 25;
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_allow: vec!["*".to_string()],
            request_timeout: min_request_timeout(&batch_policy, max_symbols_per_request),
            alpha_vantage_api_key: None,
            alpha_vantage_base_url: alpha_vantage::BASE_URL.to_string(),
            batch_policy,
            max_symbols_per_request,
            watchlist_rate_limit: 60,
            watchlist_rate_window: Duration::from_millis(60_000),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("SD_LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid SD_LISTEN_ADDR: {}", raw))?,
            Err(_) => defaults.listen_addr,
        };
        let cors_allow = std::env::var("SD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let alpha_vantage_api_key = std::env::var(alpha_vantage::API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());
        let alpha_vantage_base_url = std::env::var("SD_ALPHA_VANTAGE_BASE_URL")
            .unwrap_or(defaults.alpha_vantage_base_url);
        let batch_policy = BatchPolicy::new(
            env_or("SD_BATCH_SIZE", defaults.batch_policy.batch_size),
            Duration::from_millis(env_or("SD_BATCH_DELAY_MS", 12_000u64)),
        );
        let max_symbols_per_request =
            env_or("SD_MAX_SYMBOLS_PER_REQUEST", defaults.max_symbols_per_request);
        let request_timeout = request_timeout(
            std::env::var("SD_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|raw| raw.trim().parse().ok())
                .map(Duration::from_millis),
            min_request_timeout(&batch_policy, max_symbols_per_request),
        );
        let window_ms = env_or("SD_WATCHLIST_RATE_WINDOW_MS", 60_000u64);

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout,
            alpha_vantage_api_key,
            alpha_vantage_base_url,
            batch_policy,
            max_symbols_per_request,
            watchlist_rate_limit: env_or("SD_WATCHLIST_RATE_LIMIT", defaults.watchlist_rate_limit),
            watchlist_rate_window: Duration::from_millis(window_ms),
        })
    }
}

/// Slowest multi-quote request allowed by `policy` and `max_symbols`, plus a
/// margin: every batch runs into the upstream timeout and every gap is paced.
pub fn min_request_timeout(policy: &BatchPolicy, max_symbols: usize) -> Duration {
    let batches = u32::try_from(policy.batch_count(max_symbols.max(1))).unwrap_or(u32::MAX);
    alpha_vantage::REQUEST_TIMEOUT
        .saturating_mul(batches)
        .saturating_add(policy.batch_delay.saturating_mul(batches - 1))
        .saturating_add(TIMEOUT_MARGIN)
}

/// Configured timeout, raised to `floor` when missing or too short.
fn request_timeout(configured: Option<Duration>, floor: Duration) -> Duration {
    match configured {
        Some(timeout) if timeout >= floor => timeout,
        Some(timeout) => {
            tracing::warn!(
                "SD_REQUEST_TIMEOUT_MS of {:?} cannot fit a full multi-quote request, using {:?}",
                timeout,
                floor
            );
            floor
        }
        None => floor,
    }
}

/// Parse an environment variable, keeping `default` when unset or malformed.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.cors_allow, vec!["*"]);
        assert_eq!(config.request_timeout, Duration::from_secs(108));
        assert_eq!(config.alpha_vantage_base_url, "https://www.alphavantage.co/query");
        assert_eq!(config.batch_policy, BatchPolicy::default());
        assert_eq!(config.max_symbols_per_request, 25);
        assert_eq!(config.watchlist_rate_limit, 60);
        assert_eq!(config.watchlist_rate_window, Duration::from_secs(60));
    }

    #[test]
    fn test_min_request_timeout_covers_slowest_batch_run() {
        // 25 symbols: 5 batches of 10 s upstream time and 4 gaps of 12 s
        let policy = BatchPolicy::default();
        assert_eq!(min_request_timeout(&policy, 25), Duration::from_secs(50 + 48 + 10));

        let single = BatchPolicy::new(5, Duration::from_secs(12));
        assert_eq!(min_request_timeout(&single, 3), Duration::from_secs(20));
        assert_eq!(min_request_timeout(&single, 0), Duration::from_secs(20));
    }

    #[test]
    fn test_request_timeout_is_never_below_floor() {
        let floor = Duration::from_secs(108);
        assert_eq!(request_timeout(None, floor), floor);
        assert_eq!(request_timeout(Some(Duration::from_secs(60)), floor), floor);
        assert_eq!(
            request_timeout(Some(Duration::from_secs(300)), floor),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("SD_TEST_SURELY_UNSET_VARIABLE", 7u32), 7);
    }
}
