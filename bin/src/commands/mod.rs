//! CLI command implementations.

pub(crate) mod detect;
pub(crate) mod query;
pub(crate) mod run;
pub(crate) mod symbols;
pub(crate) mod sync;
