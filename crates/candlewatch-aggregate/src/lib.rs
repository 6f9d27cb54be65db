//! On-demand OHLCV resampling for candlewatch.
//!
//! Coarser resolutions are never stored; they are computed from the base
//! series at read time:
//!
//! - [`Bucket`] - Aggregated OHLCV bucket
//! - [`resample`] - Pure grouping of base candles into buckets
//! - [`Resampler`] - Store-backed resampling by symbol and interval

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bucket;
mod resample;

pub use bucket::Bucket;
pub use resample::{Resampler, resample};
