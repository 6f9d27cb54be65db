//! Kline payload parsing.

use candlewatch_types::{Candle, CandleError};
use serde_json::Value;
use thiserror::Error;

/// Number of leading fields each kline record must carry.
const KLINE_FIELDS: usize = 7;

/// Errors that can occur during kline parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Payload is not a JSON array of arrays.
    #[error("Invalid kline payload: {0}")]
    Payload(String),

    /// Record has fewer fields than required.
    #[error("Kline record {index} has {len} fields (expected at least 7)")]
    ShortRecord {
        /// Record position in the payload.
        index: usize,
        /// Number of fields present.
        len: usize,
    },

    /// A field is neither a number nor a numeric string.
    #[error("Kline record {index} field {field} is not numeric")]
    NotNumeric {
        /// Record position in the payload.
        index: usize,
        /// Field position in the record.
        field: usize,
    },

    /// Record decoded but violates the OHLCV invariants.
    #[error("Kline record {index} is inconsistent: {source}")]
    Invalid {
        /// Record position in the payload.
        index: usize,
        /// The violated invariant.
        #[source]
        source: CandleError,
    },
}

/// Parses an exchange kline payload into candles.
///
/// Each record is an array whose first seven fields are
/// `[open_time, open, high, low, close, volume, close_time]`. Prices and
/// volume may be numbers or decimal strings. Trailing fields (quote volume,
/// trade count, ...) are ignored.
///
/// # Errors
///
/// Returns an error if the payload is malformed or any record fails
/// validation.
pub fn parse_klines(body: &[u8]) -> Result<Vec<Candle>, ParseError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ParseError::Payload(e.to_string()))?;
    let Value::Array(records) = value else {
        return Err(ParseError::Payload("expected a JSON array".to_string()));
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_record(index, record))
        .collect()
}

fn parse_record(index: usize, record: &Value) -> Result<Candle, ParseError> {
    let Value::Array(fields) = record else {
        return Err(ParseError::Payload(format!("record {index} is not an array")));
    };
    if fields.len() < KLINE_FIELDS {
        return Err(ParseError::ShortRecord {
            index,
            len: fields.len(),
        });
    }

    let int = |field: usize| {
        as_i64(&fields[field]).ok_or(ParseError::NotNumeric { index, field })
    };
    let float = |field: usize| {
        as_f64(&fields[field]).ok_or(ParseError::NotNumeric { index, field })
    };

    let candle = Candle::new(
        int(0)?,
        int(6)?,
        float(1)?,
        float(2)?,
        float(3)?,
        float(4)?,
        float(5)?,
    );
    candle
        .validate()
        .map_err(|source| ParseError::Invalid { index, source })?;
    Ok(candle)
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
