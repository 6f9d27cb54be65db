//! Shared handler state.

use candlewatch_aggregate::Resampler;
use candlewatch_daemon::LoopStats;
use candlewatch_store::CandleStore;
use candlewatch_types::SymbolList;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Symbol list shared between the scheduler (which reloads it) and handlers.
pub type SharedSymbols = Arc<RwLock<SymbolList>>;

/// State passed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Store-backed resampler.
    pub resampler: Resampler,
    /// Currently configured symbols.
    pub symbols: SharedSymbols,
    /// Counters of the background loops, reported by `/health`.
    pub loops: Vec<Arc<LoopStats>>,
}

impl AppState {
    /// Creates state over `store` with the given symbols and no loops.
    #[must_use]
    pub fn new(store: Arc<dyn CandleStore>, symbols: SharedSymbols) -> Self {
        Self {
            resampler: Resampler::new(store),
            symbols,
            loops: Vec::new(),
        }
    }

    /// Attaches loop counters for `/health`.
    #[must_use]
    pub fn with_loops(mut self, loops: Vec<Arc<LoopStats>>) -> Self {
        self.loops = loops;
        self
    }
}
