//! Error types shared across candlewatch crates.

use std::path::PathBuf;
use thiserror::Error;

/// A candle that violates the OHLCV invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CandleError {
    /// One of the numeric fields is NaN or infinite.
    #[error("Non-finite {field} in candle at {open_time}")]
    NonFinite {
        /// The offending field name.
        field: &'static str,
        /// Open time of the candle (ms).
        open_time: i64,
    },

    /// `close_time` does not come after `open_time`.
    #[error("Close time {close_time} is not after open time {open_time}")]
    TimeOrder {
        /// Open time (ms).
        open_time: i64,
        /// Close time (ms).
        close_time: i64,
    },

    /// Prices are outside the `[low, high]` envelope.
    #[error("Price envelope violated at {open_time}: low={low} high={high} open={open} close={close}")]
    Envelope {
        /// Open time (ms).
        open_time: i64,
        /// Open price.
        open: f64,
        /// High price.
        high: f64,
        /// Low price.
        low: f64,
        /// Close price.
        close: f64,
    },

    /// Volume is negative.
    #[error("Negative volume {volume} at {open_time}")]
    NegativeVolume {
        /// Open time (ms).
        open_time: i64,
        /// The reported volume.
        volume: f64,
    },
}

/// Startup configuration failures. These are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The symbol list file could not be read.
    #[error("Failed to read symbol list '{path}': {source}")]
    ReadSymbols {
        /// Path of the symbol file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The symbol list file is not a JSON array of strings.
    #[error("Failed to parse symbol list '{path}': {source}")]
    ParseSymbols {
        /// Path of the symbol file.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The symbol list contains no usable symbols.
    #[error("Symbol list '{0}' is empty")]
    EmptySymbols(PathBuf),

    /// A setting has an invalid value.
    #[error("Invalid setting {name}: {reason}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
