//! Run counters for scheduled loops.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Thread-safe counters for one loop.
#[derive(Debug)]
pub struct LoopStats {
    name: String,
    runs: AtomicU64,
    failures: AtomicU64,
    panics: AtomicU64,
    last_success: Mutex<Option<DateTime<Utc>>>,
    last_error: Mutex<Option<String>>,
}

/// Point-in-time copy of [`LoopStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopSnapshot {
    /// Loop name.
    pub name: String,
    /// Ticks started.
    pub runs: u64,
    /// Ticks that returned an error.
    pub failures: u64,
    /// Ticks that panicked.
    pub panics: u64,
    /// Completion time of the last successful tick.
    pub last_success: Option<DateTime<Utc>>,
    /// Message of the most recent failure.
    pub last_error: Option<String>,
}

impl LoopStats {
    /// Creates zeroed counters for the loop `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runs: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            panics: AtomicU64::new(0),
            last_success: Mutex::new(None),
            last_error: Mutex::new(None),
        }
    }

    /// Returns the loop name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn record_start(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_success(&self, at: DateTime<Utc>) {
        *self.last_success.lock().unwrap_or_else(PoisonError::into_inner) = Some(at);
    }

    pub(crate) fn record_failure(&self, error: String) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    pub(crate) fn record_panic(&self) {
        self.panics.fetch_add(1, Ordering::Relaxed);
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) =
            Some("task panicked".to_string());
    }

    /// Returns the current counters.
    #[must_use]
    pub fn snapshot(&self) -> LoopSnapshot {
        LoopSnapshot {
            name: self.name.clone(),
            runs: self.runs.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            panics: self.panics.load(Ordering::Relaxed),
            last_success: *self.last_success.lock().unwrap_or_else(PoisonError::into_inner),
            last_error: self
                .last_error
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}
