//! Fixed-window request limiter keyed by client id.
//!
//! The first request from a client opens a window of `window` length.
//! Up to `limit` requests are allowed inside it; the window resets on the
//! first request after it expires. Once many clients are tracked, expired
//! windows are dropped, at most once per window length.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// Rejected; the window reopens after `retry_after`.
    Limited { retry_after: Duration },
}

/// Tracked clients before expired windows are swept.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug)]
struct Window {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug, Default)]
struct Windows {
    by_client: HashMap<String, Window>,
    next_sweep: Option<Instant>,
}

impl Windows {
    /// Drop expired windows once the map is large, at most once per `period`.
    fn sweep(&mut self, now: Instant, threshold: usize, period: Duration) {
        if self.by_client.len() < threshold {
            return;
        }
        if self.next_sweep.is_some_and(|at| now < at) {
            return;
        }

        let before = self.by_client.len();
        self.by_client.retain(|_, window| now <= window.reset_at);
        self.next_sweep = Some(now + period);
        tracing::debug!(
            "Rate limiter swept {} expired windows, {} remain",
            before - self.by_client.len(),
            self.by_client.len()
        );
    }
}

pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    sweep_threshold: usize,
    windows: Mutex<Windows>,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            sweep_threshold: SWEEP_THRESHOLD,
            windows: Mutex::new(Windows::default()),
        }
    }

    /// Lock the windows map, recovering from poison if necessary.
    fn lock_windows(&self) -> MutexGuard<'_, Windows> {
        self.windows.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Rate limiter windows mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Count one request from `client_id`.
    pub fn check(&self, client_id: &str) -> RateDecision {
        self.check_at(client_id, Instant::now())
    }

    /// Number of clients with a window in memory.
    pub fn tracked_clients(&self) -> usize {
        self.lock_windows().by_client.len()
    }

    fn check_at(&self, client_id: &str, now: Instant) -> RateDecision {
        let mut windows = self.lock_windows();
        windows.sweep(now, self.sweep_threshold, self.window);

        if let Some(window) = windows.by_client.get_mut(client_id) {
            if now <= window.reset_at {
                if window.count >= self.limit {
                    return RateDecision::Limited {
                        retry_after: window.reset_at.saturating_duration_since(now),
                    };
                }
                window.count += 1;
                return RateDecision::Allowed;
            }
        }

        windows.by_client.insert(
            client_id.to_string(),
            Window {
                count: 1,
                reset_at: now + self.window,
            },
        );
        RateDecision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));
        let start = Instant::now();

        for _ in 0..3 {
            assert_eq!(limiter.check_at("a", start), RateDecision::Allowed);
        }
        let later = start + Duration::from_secs(20);
        assert_eq!(
            limiter.check_at("a", later),
            RateDecision::Limited {
                retry_after: Duration::from_secs(40)
            }
        );
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert_eq!(limiter.check_at("a", start), RateDecision::Allowed);
        assert!(matches!(
            limiter.check_at("a", start + Duration::from_secs(60)),
            RateDecision::Limited { .. }
        ));
        assert_eq!(
            limiter.check_at("a", start + Duration::from_millis(60_001)),
            RateDecision::Allowed
        );
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert_eq!(limiter.check_at("a", start), RateDecision::Allowed);
        assert_eq!(limiter.check_at("b", start), RateDecision::Allowed);
        assert!(matches!(
            limiter.check_at("a", start),
            RateDecision::Limited { .. }
        ));
    }

    fn limiter_with_threshold(threshold: usize) -> FixedWindowLimiter {
        FixedWindowLimiter {
            sweep_threshold: threshold,
            ..FixedWindowLimiter::new(5, Duration::from_secs(60))
        }
    }

    #[test]
    fn test_expired_windows_are_swept() {
        let limiter = limiter_with_threshold(3);
        let start = Instant::now();

        for id in ["a", "b", "c"] {
            limiter.check_at(id, start);
        }
        assert_eq!(limiter.tracked_clients(), 3);

        // All three expired; the next check drops them before adding "d"
        limiter.check_at("d", start + Duration::from_secs(61));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_live_windows_survive_sweep() {
        let limiter = limiter_with_threshold(2);
        let start = Instant::now();

        limiter.check_at("old", start);
        limiter.check_at("recent", start + Duration::from_secs(30));
        limiter.check_at("new", start + Duration::from_secs(61));

        assert_eq!(limiter.tracked_clients(), 2);
        for _ in 0..4 {
            limiter.check_at("recent", start + Duration::from_secs(62));
        }
        // "recent" kept its count through the sweep
        assert!(matches!(
            limiter.check_at("recent", start + Duration::from_secs(62)),
            RateDecision::Limited { .. }
        ));
    }

    #[test]
    fn test_sweep_runs_at_most_once_per_window() {
        let limiter = limiter_with_threshold(1);
        let start = Instant::now();

        limiter.check_at("a", start);
        // Sweeps (nothing expired yet) and schedules the next one a window later
        limiter.check_at("b", start + Duration::from_secs(1));
        // "a" has expired, but the next sweep is not due until 61s
        limiter.check_at("c", start + Duration::from_secs(60) + Duration::from_millis(500));
        assert_eq!(limiter.tracked_clients(), 3);

        limiter.check_at("d", start + Duration::from_secs(61));
        assert_eq!(limiter.tracked_clients(), 3);
    }

    #[test]
    fn test_default_limit_rejects_sixty_first_request() {
        let limiter = FixedWindowLimiter::new(60, Duration::from_secs(60));
        let start = Instant::now();

        for i in 0..60 {
            assert_eq!(
                limiter.check_at("client", start + Duration::from_millis(i * 10)),
                RateDecision::Allowed
            );
        }
        assert!(matches!(
            limiter.check_at("client", start + Duration::from_secs(1)),
            RateDecision::Limited { .. }
        ));
    }
}
