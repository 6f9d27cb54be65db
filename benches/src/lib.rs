//! Benchmark fixtures for candlewatch.

use candlewatch_lib::Candle;
use serde_json::{Value, json};

/// Open time of the first synthetic candle (2024-01-01T00:00:00Z).
pub const START_MS: i64 = 1_704_067_200_000;

/// Base candle width in milliseconds.
pub const STEP_MS: i64 = 300_000;

/// Generates `count` consecutive base candles following a deterministic
/// oscillating walk.
pub fn synthetic_candles(count: usize) -> Vec<Candle> {
    let mut close = 100.0_f64;
    (0..count)
        .map(|i| {
            let open_time = START_MS + i as i64 * STEP_MS;
            let open = close;
            let t = i as f64;
            close = (open + (t * 0.07).sin() * 0.8 + 0.01).max(1.0);
            let high = open.max(close) + 0.25;
            let low = open.min(close) - 0.25;
            Candle::new(
                open_time,
                open_time + STEP_MS - 1,
                open,
                high,
                low,
                close,
                10.0 + (t * 0.13).cos().abs() * 5.0,
            )
        })
        .collect()
}

/// Closing prices of [`synthetic_candles`].
pub fn synthetic_closes(count: usize) -> Vec<f64> {
    synthetic_candles(count).iter().map(|c| c.close).collect()
}

/// Encodes candles as an exchange kline payload with string-encoded prices.
pub fn kline_payload(candles: &[Candle]) -> Vec<u8> {
    let rows: Vec<Value> = candles
        .iter()
        .map(|c| {
            json!([
                c.open_time,
                c.open.to_string(),
                c.high.to_string(),
                c.low.to_string(),
                c.close.to_string(),
                c.volume.to_string(),
                c.close_time,
                "0",
                0,
                "0",
                "0",
                "0"
            ])
        })
        .collect();
    serde_json::to_vec(&Value::Array(rows)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_candles_are_valid() {
        let candles = synthetic_candles(500);
        assert_eq!(candles.len(), 500);
        for candle in &candles {
            candle.validate().unwrap();
        }
        assert_eq!(candles[1].open_time - candles[0].open_time, STEP_MS);
    }

    #[test]
    fn test_payload_parses() {
        let candles = synthetic_candles(20);
        let parsed = candlewatch_lib::parse_klines(&kline_payload(&candles)).unwrap();
        assert_eq!(parsed.len(), 20);
        assert_eq!(parsed[0].open_time, START_MS);
    }
}
