//! Detection and notification errors.

use candlewatch_store::StoreError;
use thiserror::Error;

/// Why a symbol could not be evaluated.
#[derive(Error, Debug)]
pub enum SignalError {
    /// Not enough closed buckets to compute the indicators.
    #[error("Insufficient history: have {have} buckets, need {need}")]
    InsufficientHistory {
        /// Closed buckets available.
        have: usize,
        /// Buckets required.
        need: usize,
    },

    /// Reading the candle store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Failure to deliver an alert.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The transport answered with a non-success status.
    #[error("Notification rejected with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
}
