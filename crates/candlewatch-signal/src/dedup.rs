//! Alert cooldown cache.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Key to expiry-time map used to suppress repeat alerts.
///
/// Time is always passed in by the caller. An entry is live while
/// `now < expiry`.
#[derive(Debug)]
pub struct DedupCache {
    ttl: TimeDelta,
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl DedupCache {
    /// Creates an empty cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns true if `key` has an unexpired entry at `now`.
    #[must_use]
    pub fn is_live(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|expiry| now < *expiry)
    }

    /// Inserts `key` if it is absent or expired and returns true; returns
    /// false and leaves a live entry untouched otherwise.
    pub fn try_claim(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(expiry) if now < *expiry => false,
            _ => {
                entries.insert(key.to_string(), now + self.ttl);
                true
            }
        }
    }

    /// Removes expired entries, returning how many were dropped.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, expiry| now < *expiry);
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawns a task that sweeps expired entries every `every`.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = cache.sweep(Utc::now());
                if removed > 0 {
                    tracing::debug!(removed, remaining = cache.len(), "swept dedup cache");
                }
            }
        })
    }
}
