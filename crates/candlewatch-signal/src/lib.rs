//! MACD crossover detection and alerting for candlewatch.
//!
//! - [`indicators`] - EMA and MACD series
//! - [`gates`] - Trend, depth and crossover checks
//! - [`DedupCache`] - Per-key alert cooldown
//! - [`Notifier`] / [`TelegramNotifier`] - Outbound alert transport
//! - [`SignalDetector`] - Per-pass scan, dedup and batched notification

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dedup;
mod detector;
mod error;
pub mod gates;
pub mod indicators;
mod notify;

pub use dedup::DedupCache;
pub use detector::{DetectionReport, DetectorConfig, Evaluation, SignalDetector, format_message};
pub use error::{NotifyError, SignalError};
pub use notify::{Notifier, TelegramNotifier};
