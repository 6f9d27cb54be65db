//! Base-candle to bucket resampling.

use candlewatch_store::{CandleStore, RangeQuery, StoreError};
use candlewatch_types::{Candle, Interval};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::Bucket;

/// Groups base candles into buckets of `bucket_ms` and returns the most recent
/// `limit` buckets in ascending order.
///
/// Input order does not matter: `open` and `close` come from the member
/// candles with the smallest and largest open time. A bucket width finer than
/// the base resolution, or not a whole multiple of it, falls back to the base
/// resolution.
#[must_use]
pub fn resample(candles: &[Candle], bucket_ms: i64, limit: usize) -> Vec<Bucket> {
    if limit == 0 || candles.is_empty() {
        return Vec::new();
    }

    let base_ms = Interval::BASE.millis();
    let bucket_ms = if bucket_ms >= base_ms && bucket_ms % base_ms == 0 {
        bucket_ms
    } else {
        base_ms
    };

    let mut groups: BTreeMap<i64, BucketBuilder> = BTreeMap::new();
    for candle in candles {
        let start = candle.open_time.div_euclid(bucket_ms) * bucket_ms;
        groups
            .entry(start)
            .and_modify(|b| b.update(candle))
            .or_insert_with(|| BucketBuilder::new(start, candle));
    }

    let mut buckets: Vec<Bucket> = groups
        .into_values()
        .rev()
        .take(limit)
        .map(BucketBuilder::finish)
        .collect();
    buckets.reverse();
    buckets
}

/// Accumulates one bucket.
#[derive(Debug)]
struct BucketBuilder {
    start: i64,
    first_open_time: i64,
    last_open_time: i64,
    close_time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    count: u32,
}

impl BucketBuilder {
    const fn new(start: i64, candle: &Candle) -> Self {
        Self {
            start,
            first_open_time: candle.open_time,
            last_open_time: candle.open_time,
            close_time: candle.close_time,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            count: 1,
        }
    }

    fn update(&mut self, candle: &Candle) {
        if candle.open_time < self.first_open_time {
            self.first_open_time = candle.open_time;
            self.open = candle.open;
        }
        if candle.open_time > self.last_open_time {
            self.last_open_time = candle.open_time;
            self.close = candle.close;
        }
        self.close_time = self.close_time.max(candle.close_time);
        self.high = self.high.max(candle.high);
        self.low = self.low.min(candle.low);
        self.volume += candle.volume;
        self.count += 1;
    }

    const fn finish(self) -> Bucket {
        Bucket {
            open_time: self.start,
            close_time: self.close_time,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            candle_count: self.count,
        }
    }
}

/// Resamples stored base candles on demand.
#[derive(Debug, Clone)]
pub struct Resampler {
    store: Arc<dyn CandleStore>,
}

impl Resampler {
    /// Creates a resampler reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CandleStore>) -> Self {
        Self { store }
    }

    /// Returns the most recent `limit` buckets of `interval` for `symbol`,
    /// oldest first. The newest bucket may be partial.
    ///
    /// Reads the latest `limit` buckets' worth of base candles by count, so
    /// gaps in the stored series never reduce the number of buckets. A
    /// bucket cut short at the oldest end of the read is dropped when more
    /// than `limit` buckets result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn resample(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
    ) -> Result<Vec<Bucket>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        if interval.is_base() {
            let mut candles = self.store.range(symbol, &RangeQuery::latest(limit)).await?;
            candles.reverse();
            return Ok(candles.into_iter().map(Bucket::from).collect());
        }

        // Count-based read: gaps in the series must not shrink the result.
        let per_bucket = u32::try_from(interval.base_candles()).unwrap_or(1);
        let mut candles = self
            .store
            .range(symbol, &RangeQuery::latest(limit.saturating_mul(per_bucket)))
            .await?;
        candles.reverse();

        tracing::trace!(
            symbol,
            interval = %interval,
            limit,
            candles = candles.len(),
            "resampling"
        );

        Ok(resample(&candles, interval.millis(), limit as usize))
    }
}
