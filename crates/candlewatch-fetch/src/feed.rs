//! Feed abstraction.

use async_trait::async_trait;
use candlewatch_types::{Candle, Interval};

use crate::FetchError;

/// Parameters of a single kline fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineRequest {
    /// Exchange symbol (e.g. `BTCUSDT`).
    pub symbol: String,
    /// Candle resolution.
    pub interval: Interval,
    /// Inclusive lower bound on open time (ms).
    pub start_time: Option<i64>,
    /// Inclusive upper bound on open time (ms).
    pub end_time: Option<i64>,
    /// Maximum number of candles to return.
    pub limit: u32,
}

impl KlineRequest {
    /// Creates an unbounded request for the most recent `limit` candles.
    #[must_use]
    pub fn new(symbol: impl Into<String>, interval: Interval, limit: u32) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            start_time: None,
            end_time: None,
            limit,
        }
    }

    /// Sets the inclusive start time.
    #[must_use]
    pub const fn starting_at(mut self, start_time: i64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Sets the inclusive end time.
    #[must_use]
    pub const fn ending_at(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

/// A source of candles in ascending open-time order.
#[async_trait]
pub trait KlineFeed: Send + Sync + std::fmt::Debug {
    /// Fetches candles matching `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed is unreachable or the payload is malformed.
    async fn fetch_klines(&self, request: &KlineRequest) -> Result<Vec<Candle>, FetchError>;
}
