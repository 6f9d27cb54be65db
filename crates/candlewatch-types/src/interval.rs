//! Candle resolutions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Candle resolution.
///
/// [`Interval::BASE`] is the resolution ingested from the feed; every other
/// variant is produced by resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Interval {
    /// 5-minute candles (base resolution).
    #[default]
    #[serde(rename = "5m")]
    Minute5,
    /// 15-minute buckets.
    #[serde(rename = "15m")]
    Minute15,
    /// 1-hour buckets.
    #[serde(rename = "1h")]
    Hour1,
    /// 4-hour buckets.
    #[serde(rename = "4h")]
    Hour4,
    /// Daily buckets (UTC epoch aligned).
    #[serde(rename = "1d")]
    Day1,
}

impl Interval {
    /// Resolution stored by the candle store.
    pub const BASE: Self = Self::Minute5;

    /// Returns the duration in seconds.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        match self {
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Hour1 => 3_600,
            Self::Hour4 => 14_400,
            Self::Day1 => 86_400,
        }
    }

    /// Returns the duration in milliseconds.
    #[must_use]
    pub const fn millis(&self) -> i64 {
        self.seconds() * 1000
    }

    /// Returns true if this is the base resolution.
    #[must_use]
    pub const fn is_base(&self) -> bool {
        matches!(self, Self::Minute5)
    }

    /// Number of base candles that make up one bucket of this interval.
    #[must_use]
    pub const fn base_candles(&self) -> i64 {
        self.millis() / Self::BASE.millis()
    }

    /// Returns the exchange interval code (e.g. `"15m"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Hour1 => "1h",
            Self::Hour4 => "4h",
            Self::Day1 => "1d",
        }
    }

    /// Parses a query-string value, falling back to the base resolution for
    /// anything unrecognized.
    #[must_use]
    pub fn from_query(value: &str) -> Self {
        value.parse().unwrap_or(Self::BASE)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5m" | "m5" | "minute5" => Ok(Self::Minute5),
            "15m" | "m15" | "minute15" => Ok(Self::Minute15),
            "1h" | "h1" | "hour" | "hour1" => Ok(Self::Hour1),
            "4h" | "h4" | "hour4" => Ok(Self::Hour4),
            "1d" | "d1" | "day" | "day1" | "daily" => Ok(Self::Day1),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: 5m, 15m, 1h, 4h, 1d",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}
