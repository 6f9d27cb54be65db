//! Resampled OHLCV bucket.

use candlewatch_types::Candle;
use serde::{Deserialize, Serialize};

/// OHLCV values aggregated over one interval-aligned bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket start in epoch milliseconds.
    pub open_time: i64,
    /// Latest close time of the member candles (ms).
    pub close_time: i64,
    /// Open of the earliest member candle.
    pub open: f64,
    /// Highest high.
    pub high: f64,
    /// Lowest low.
    pub low: f64,
    /// Close of the latest member candle.
    pub close: f64,
    /// Summed volume.
    pub volume: f64,
    /// Number of base candles in the bucket.
    pub candle_count: u32,
}

impl Bucket {
    /// Returns true once every member candle has closed at `now_ms`.
    #[must_use]
    pub const fn is_closed_at(&self, now_ms: i64) -> bool {
        self.close_time <= now_ms
    }
}

impl From<Candle> for Bucket {
    fn from(candle: Candle) -> Self {
        Self {
            open_time: candle.open_time,
            close_time: candle.close_time,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            candle_count: 1,
        }
    }
}
