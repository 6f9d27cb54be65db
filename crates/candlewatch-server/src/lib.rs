//! HTTP query surface for candlewatch.
//!
//! - `GET /klines?symbol=&interval=&limit=` - Resampled candles as
//!   exchange-style 12-field rows
//! - `GET /symbols` - Configured symbol list
//! - `GET /health` - Liveness and background loop counters
//!
//! Responses are gzip-compressed when the client accepts it, and CORS is
//! open for `GET`/`OPTIONS`.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod kline;
mod routes;
mod state;

pub use error::ApiError;
pub use kline::{DEFAULT_LIMIT, KlinesQuery, MAX_LIMIT, kline_row};
pub use routes::{router, serve};
pub use state::{AppState, SharedSymbols};
