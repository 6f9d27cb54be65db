//! Core types for the candlewatch kline engine.
//!
//! This crate provides the fundamental data structures shared by every other
//! candlewatch crate:
//!
//! - [`Candle`] - One base-resolution OHLCV record
//! - [`Interval`] - Candle resolution (base and resampled)
//! - [`SymbolList`] - Ordered set of tracked trading symbols
//! - [`CandleError`] / [`ConfigError`] - Validation and configuration errors

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod candle;
mod error;
mod interval;
mod symbols;

pub use candle::{Candle, now_millis};
pub use error::{CandleError, ConfigError};
pub use interval::{Interval, IntervalParseError};
pub use symbols::SymbolList;
