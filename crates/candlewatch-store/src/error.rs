//! Storage errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in a candle store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database could not be opened or created.
    #[error("Failed to open database '{path}': {source}")]
    Open {
        /// Database file path.
        path: PathBuf,
        /// The underlying driver error.
        #[source]
        source: sqlx::Error,
    },

    /// A query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
