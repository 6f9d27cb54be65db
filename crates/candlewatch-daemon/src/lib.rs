//! Scheduled background loops for candlewatch.
//!
//! Every periodic job (sync, detection, retention, cache sweeping) runs
//! through the same loop runner:
//!
//! - [`Schedule`] - Loop name, period and start behaviour
//! - [`run_every`] - Runs a fallible task on a fixed period, containing
//!   failures and panics
//! - [`LoopStats`] - Thread-safe run counters shared with the status surface

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod schedule;
mod stats;

pub use schedule::{Schedule, run_every, spawn_loop};
pub use stats::{LoopSnapshot, LoopStats};
