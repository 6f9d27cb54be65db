//! `/klines` query parameters and row format.

use candlewatch_aggregate::Bucket;
use candlewatch_types::Interval;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::ApiError;

/// Buckets returned when `limit` is absent or unparsable.
pub const DEFAULT_LIMIT: u32 = 200;

/// Upper bound on `limit`.
pub const MAX_LIMIT: u32 = 1500;

/// Raw `/klines` query string. Every field is kept as text so malformed
/// values fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KlinesQuery {
    /// Trading symbol (required).
    pub symbol: Option<String>,
    /// Interval code; unrecognized values mean the base resolution.
    pub interval: Option<String>,
    /// Number of buckets.
    pub limit: Option<String>,
}

impl KlinesQuery {
    /// Returns the upper-cased symbol.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] if the symbol is missing or blank.
    pub fn symbol(&self) -> Result<String, ApiError> {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .ok_or_else(|| ApiError::BadRequest("symbol parameter is required".to_string()))
    }

    /// Returns the requested interval, defaulting to the base resolution.
    #[must_use]
    pub fn interval(&self) -> Interval {
        self.interval
            .as_deref()
            .map_or(Interval::BASE, Interval::from_query)
    }

    /// Returns the bucket limit, defaulted and capped. Zero or anything
    /// unparsable means the default.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|&l| l > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT)
    }
}

/// Formats a bucket as an exchange-style kline row:
/// `[openTime, open, high, low, close, volume, closeTime, "0", 0, "0", "0", "0"]`
/// with prices and volume as 8-decimal strings.
#[must_use]
pub fn kline_row(bucket: &Bucket) -> Value {
    json!([
        bucket.open_time,
        format!("{:.8}", bucket.open),
        format!("{:.8}", bucket.high),
        format!("{:.8}", bucket.low),
        format!("{:.8}", bucket.close),
        format!("{:.8}", bucket.volume),
        bucket.close_time,
        "0",
        0,
        "0",
        "0",
        "0"
    ])
}
