//! Base-resolution candle representation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::CandleError;

/// A single OHLCV record at the base resolution.
///
/// The owning symbol is kept outside the value; stores and feeds pass it
/// alongside the candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in epoch milliseconds, aligned to the resolution boundary.
    pub open_time: i64,
    /// Close time in epoch milliseconds (inclusive last millisecond).
    pub close_time: i64,
    /// Opening price.
    pub open: f64,
    /// Highest price during the period.
    pub high: f64,
    /// Lowest price during the period.
    pub low: f64,
    /// Closing (or latest, while the candle is still open) price.
    pub close: f64,
    /// Base asset volume.
    pub volume: f64,
}

impl Candle {
    /// Creates a new candle.
    #[must_use]
    pub const fn new(
        open_time: i64,
        close_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            open_time,
            close_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Checks the OHLCV invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), CandleError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ] {
            if !value.is_finite() {
                return Err(CandleError::NonFinite {
                    field,
                    open_time: self.open_time,
                });
            }
        }

        if self.close_time <= self.open_time {
            return Err(CandleError::TimeOrder {
                open_time: self.open_time,
                close_time: self.close_time,
            });
        }

        let inside = |p: f64| p >= self.low && p <= self.high;
        if self.low > self.high || !inside(self.open) || !inside(self.close) {
            return Err(CandleError::Envelope {
                open_time: self.open_time,
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        if self.volume < 0.0 {
            return Err(CandleError::NegativeVolume {
                open_time: self.open_time,
                volume: self.volume,
            });
        }

        Ok(())
    }
}

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle() -> Candle {
        Candle::new(
            1_700_000_100_000,
            1_700_000_399_999,
            10.0,
            12.0,
            9.5,
            11.0,
            42.0,
        )
    }

    #[test]
    fn test_valid_candle() {
        assert!(candle().validate().is_ok());
    }

    #[test]
    fn test_envelope_violation() {
        let mut c = candle();
        c.close = 12.5;
        assert!(matches!(c.validate(), Err(CandleError::Envelope { .. })));
    }

    #[test]
    fn test_time_order_violation() {
        let mut c = candle();
        c.close_time = c.open_time;
        assert!(matches!(c.validate(), Err(CandleError::TimeOrder { .. })));
    }

    #[test]
    fn test_non_finite() {
        let mut c = candle();
        c.volume = f64::NAN;
        assert!(matches!(
            c.validate(),
            Err(CandleError::NonFinite { field: "volume", .. })
        ));
    }
}
