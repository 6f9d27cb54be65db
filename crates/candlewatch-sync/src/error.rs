//! Reconciliation errors.

use candlewatch_fetch::FetchError;
use candlewatch_store::StoreError;
use thiserror::Error;

/// Why a single symbol could not be reconciled.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The feed request failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Reading or writing the store failed.
    #[error("Store failed: {0}")]
    Store(#[from] StoreError),
}
