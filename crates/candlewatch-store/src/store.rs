//! Storage abstraction.

use async_trait::async_trait;
use candlewatch_types::Candle;

use crate::{RangeQuery, StoreError};

/// Durable per-symbol series of base-resolution candles.
///
/// `(symbol, open_time)` is unique. Writing a candle whose open time already
/// exists overwrites the stored values, so replaying a fetch is harmless.
#[async_trait]
pub trait CandleStore: Send + Sync + std::fmt::Debug {
    /// Inserts or overwrites one candle.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn upsert(&self, symbol: &str, candle: &Candle) -> Result<(), StoreError>;

    /// Inserts or overwrites every candle atomically, returning how many were
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; nothing is written in that case.
    async fn upsert_batch(&self, symbol: &str, candles: &[Candle]) -> Result<u64, StoreError>;

    /// Returns the newest stored open time for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    async fn latest_open_time(&self, symbol: &str) -> Result<Option<i64>, StoreError>;

    /// Reads candles for `symbol` matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    async fn range(&self, symbol: &str, query: &RangeQuery) -> Result<Vec<Candle>, StoreError>;

    /// Returns the number of stored candles for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    async fn count(&self, symbol: &str) -> Result<u64, StoreError>;

    /// Returns every symbol with at least one stored candle, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    async fn symbols(&self) -> Result<Vec<String>, StoreError>;

    /// Deletes candles with `open_time < cutoff` across all symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    async fn delete_before(&self, cutoff: i64) -> Result<u64, StoreError>;
}
