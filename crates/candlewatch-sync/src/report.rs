//! Reconciliation outcomes.

use crate::SyncError;

/// What a symbol needed on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// No stored candles; backfilled from `from`.
    ColdStart {
        /// Requested start time (ms).
        from: i64,
    },
    /// Topped up from the latest stored open time.
    Incremental {
        /// Requested start time (ms), the previous latest open time.
        from: i64,
    },
    /// Less than one base period since the latest candle; nothing fetched.
    Fresh,
}

/// Successful reconciliation of one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolSync {
    /// The decision taken.
    pub action: SyncAction,
    /// Candles returned by the feed and upserted.
    pub fetched: usize,
}

/// Outcome for one symbol.
#[derive(Debug)]
pub struct SymbolReport {
    /// The symbol.
    pub symbol: String,
    /// Success details or the failure.
    pub result: Result<SymbolSync, SyncError>,
}

/// Outcomes of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Per-symbol outcomes in completion order.
    pub symbols: Vec<SymbolReport>,
}

impl ReconcileReport {
    /// Number of symbols reconciled without error.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.symbols.iter().filter(|s| s.result.is_ok()).count()
    }

    /// Number of symbols that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.symbols.len() - self.succeeded()
    }

    /// Total candles fetched across all symbols.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.symbols
            .iter()
            .filter_map(|s| s.result.as_ref().ok())
            .map(|s| s.fetched)
            .sum()
    }

    /// Iterates over failed symbols and their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SyncError)> {
        self.symbols
            .iter()
            .filter_map(|s| s.result.as_ref().err().map(|e| (s.symbol.as_str(), e)))
    }

    /// Returns the outcome for `symbol`, if it was reconciled.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&SymbolReport> {
        self.symbols.iter().find(|s| s.symbol == symbol)
    }
}
