//! Reconciler configuration.

use std::time::Duration;

/// Settings for [`crate::Reconciler`].
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Symbols reconciled in parallel.
    pub concurrency: usize,
    /// Pause after each successful symbol, holding its concurrency slot.
    pub throttle: Duration,
    /// Candles requested on a cold start.
    pub backfill_limit: u32,
    /// How many base periods before now a cold start begins.
    pub backfill_periods: i64,
    /// Candles requested on an incremental top-up.
    pub incremental_limit: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            throttle: Duration::from_millis(200),
            backfill_limit: 1500,
            backfill_periods: 1500,
            incremental_limit: 99,
        }
    }
}

impl SyncConfig {
    /// Sets the parallelism, clamped to at least one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the post-success throttle.
    #[must_use]
    pub const fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }
}
