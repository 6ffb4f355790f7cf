//! Per-client request budget enforced locally before any network call.
//!
//! Each client identifier owns a counter and a window expiry. The first
//! request (or the first after expiry) opens a new window with count 1;
//! once the count reaches the budget, further requests are rejected until
//! the window expires. A background sweep drops expired entries so the
//! table stays bounded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::DashboardError;

/// Default budget per window.
pub const DEFAULT_MAX_REQUESTS: u64 = 100;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60);

/// How often the background sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u64,
    reset_at: Instant,
}

/// Fixed-window rate limiter keyed by client identifier.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u64,
    window: Duration,
    allowed: AtomicU64,
    rejected: AtomicU64,
}

impl RateLimiter {
    /// Create a rate limiter with explicit budget and window.
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
            allowed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Create a shared limiter and start its sweep task on the current
    /// tokio runtime, if there is one. The task ends once every `Arc` is gone.
    pub fn shared(max_requests: u64, window: Duration) -> Arc<Self> {
        let limiter = Arc::new(Self::new(max_requests, window));
        if tokio::runtime::Handle::try_current().is_ok() {
            spawn_sweeper(Arc::downgrade(&limiter), SWEEP_INTERVAL);
        } else {
            tracing::debug!("No tokio runtime; rate-limit sweep disabled");
        }
        limiter
    }

    /// Records a request for `client_id`, returning `false` when the budget
    /// for the current window is already spent.
    pub fn check(&self, client_id: &str) -> bool {
        self.try_acquire(client_id).is_ok()
    }

    /// Like [`check`](Self::check), but reports how long until the window resets.
    pub fn try_acquire(&self, client_id: &str) -> Result<(), DashboardError> {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(client_id.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                reset_at: now + self.window,
            });

        if entry.count == 0 || now > entry.reset_at {
            entry.count = 1;
            entry.reset_at = now + self.window;
            self.allowed.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        if entry.count >= self.max_requests {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(DashboardError::RateLimited {
                reset_in: entry.reset_at.saturating_duration_since(now),
            });
        }

        entry.count += 1;
        self.allowed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Requests left for `client_id` in its current window.
    pub fn remaining(&self, client_id: &str) -> u64 {
        match self.entries.get(client_id) {
            Some(entry) if Instant::now() <= entry.reset_at => {
                self.max_requests.saturating_sub(entry.count)
            }
            _ => self.max_requests,
        }
    }

    /// Time until `client_id`'s window resets, or `None` if it has no entry.
    pub fn reset_in(&self, client_id: &str) -> Option<Duration> {
        self.entries
            .get(client_id)
            .map(|entry| entry.reset_at.saturating_duration_since(Instant::now()))
    }

    /// Removes expired entries, returning how many were dropped.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.reset_at);
        before - self.entries.len()
    }

    /// Number of tracked client identifiers.
    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }

    /// The configured max requests per window.
    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Snapshot of allow/reject counters.
    pub fn stats(&self) -> RateLimitStats {
        RateLimitStats {
            allowed: self.allowed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

/// Immutable snapshot of limiter counters for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStats {
    pub allowed: u64,
    pub rejected: u64,
}

fn spawn_sweeper(limiter: Weak<RateLimiter>, every: Duration) -> JoinHandle<()> {
    let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
    tokio::spawn(async move {
        loop {
            ticker.tick().await;
            let Some(limiter) = limiter.upgrade() else {
                break;
            };
            let removed = limiter.sweep();
            if removed > 0 {
                tracing::debug!("Swept {} expired rate-limit entries", removed);
            }
        }
    })
}
