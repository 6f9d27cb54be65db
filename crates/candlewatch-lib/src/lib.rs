//! Kline mirror, resampler and MACD crossover alerter for Binance USD-M
//! futures.
//!
//! This is a facade crate that re-exports functionality from the candlewatch
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use candlewatch_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteCandleStore::open(&StoreConfig::new("klines.db")).await?);
//!     let feed = Arc::new(BinanceClient::with_defaults()?);
//!
//!     let reconciler = Reconciler::new(feed, store.clone(), SyncConfig::default());
//!     let report = reconciler.reconcile(&["BTCUSDT", "ETHUSDT"]).await;
//!     println!("fetched {} candles", report.fetched());
//!
//!     let buckets = Resampler::new(store).resample("BTCUSDT", Interval::Hour1, 24).await?;
//!     println!("{} hourly buckets", buckets.len());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candlewatch_types::*;

// Re-export storage
pub use candlewatch_store::{
    CandleStore, MemoryCandleStore, Order, RangeQuery, SqliteCandleStore, StoreConfig, StoreError,
};

// Re-export resampling
pub use candlewatch_aggregate::{Bucket, Resampler, resample};

// Re-export exchange ingestion
#[cfg(feature = "sync")]
pub use candlewatch_fetch::{
    BinanceClient, ClientConfig, FetchError, KlineFeed, KlineRequest, ParseError, parse_klines,
};

#[cfg(feature = "sync")]
pub use candlewatch_sync::{
    ReconcileReport, Reconciler, SymbolReport, SymbolSync, SyncAction, SyncConfig, SyncError,
};

// Re-export signal detection
#[cfg(feature = "signal")]
pub use candlewatch_signal::{
    DedupCache, DetectionReport, DetectorConfig, Evaluation, Notifier, NotifyError, SignalDetector,
    SignalError, TelegramNotifier, format_message, gates, indicators,
};

// Re-export the scheduler and HTTP surface
#[cfg(feature = "server")]
pub use candlewatch_daemon::{LoopSnapshot, LoopStats, Schedule, run_every, spawn_loop};

#[cfg(feature = "server")]
pub use candlewatch_server::{ApiError, AppState, KlinesQuery, SharedSymbols, router, serve};

/// Prelude module for convenient imports.
///
/// ```
/// use candlewatch_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candlewatch_types::{Candle, Interval, SymbolList, now_millis};

    pub use candlewatch_store::{
        CandleStore, MemoryCandleStore, RangeQuery, SqliteCandleStore, StoreConfig,
    };

    pub use candlewatch_aggregate::{Bucket, Resampler};

    #[cfg(feature = "sync")]
    pub use candlewatch_fetch::{BinanceClient, ClientConfig, KlineFeed};

    #[cfg(feature = "sync")]
    pub use candlewatch_sync::{Reconciler, SyncConfig};

    #[cfg(feature = "signal")]
    pub use candlewatch_signal::{
        DedupCache, DetectorConfig, Notifier, SignalDetector, TelegramNotifier,
    };

    #[cfg(feature = "server")]
    pub use candlewatch_daemon::{Schedule, spawn_loop};

    #[cfg(feature = "server")]
    pub use candlewatch_server::{AppState, router, serve};
}
