//! Exchange kline feed client for candlewatch.
//!
//! This crate provides the external data source used by the sync reconciler:
//!
//! - [`KlineFeed`] - Async seam implemented by real and fake feeds
//! - [`KlineRequest`] - Symbol, resolution, optional time bounds and limit
//! - [`BinanceClient`] - HTTP client with connection pooling and retries
//! - [`parse_klines`] - Raw kline payload parsing
//! - [`url::klines_url`] - Kline endpoint URL construction

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod feed;
mod parse;
pub mod url;

pub use client::{BinanceClient, ClientConfig, FetchError};
pub use feed::{KlineFeed, KlineRequest};
pub use parse::{ParseError, parse_klines};
