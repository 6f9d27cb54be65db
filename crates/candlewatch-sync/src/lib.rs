//! Incremental kline synchronization for candlewatch.
//!
//! Each tick, the [`Reconciler`] decides per symbol whether the stored series
//! needs a cold backfill, an incremental top-up or nothing at all, fetches
//! the missing candles and upserts them:
//!
//! - [`Reconciler`] - Bounded-concurrency reconciliation pass
//! - [`SyncConfig`] - Fetch windows, concurrency and throttle
//! - [`SyncAction`] - What a symbol needed this tick
//! - [`ReconcileReport`] - Per-symbol outcomes of one pass

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod reconciler;
mod report;

pub use config::SyncConfig;
pub use error::SyncError;
pub use reconciler::Reconciler;
pub use report::{ReconcileReport, SymbolReport, SymbolSync, SyncAction};
