//! Candle persistence for candlewatch.
//!
//! One series of base-resolution candles per symbol, keyed by
//! `(symbol, open_time)`:
//!
//! - [`CandleStore`] - Async storage seam
//! - [`SqliteCandleStore`] - Durable store backed by SQLite (WAL)
//! - [`MemoryCandleStore`] - In-process store for tests and ephemeral runs
//! - [`RangeQuery`] - Bounded, ordered range reads

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod memory;
mod query;
mod sqlite;
mod store;

pub use error::StoreError;
pub use memory::MemoryCandleStore;
pub use query::{Order, RangeQuery};
pub use sqlite::{SqliteCandleStore, StoreConfig};
pub use store::CandleStore;
