//! # ns-core
//!
//! Core error handling shared by the NextStat ROOT conversion crates.
//!
//! Every fallible operation in `ns-prob` and `ns-root` returns
//! [`Result`], so callers deal with a single error taxonomy regardless of
//! which layer (interval statistics, classification, extraction, table
//! building) raised it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
