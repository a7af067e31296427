//! Error types for NextStat

use thiserror::Error;

/// NextStat error type
#[derive(Error, Debug)]
pub enum Error {
    /// Object does not match any supported kind in the requested scope.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Efficiency (or histogram) dimension outside the supported range.
    #[error("Dimensionality error: expected {expected}, got {got}")]
    Dimensionality {
        /// Human-readable description of the accepted dimensions.
        expected: String,
        /// Dimension of the offending object.
        got: usize,
    },

    /// Passed/total histograms that cannot form an efficiency.
    #[error("Inconsistent histogram pair: {0}")]
    InconsistentPair(String),

    /// Configuration string that matches no known option.
    #[error("Unknown option '{value}' for {option}")]
    UnknownOption {
        /// Which option was being parsed (e.g. "statistic option").
        option: &'static str,
        /// The rejected input.
        value: String,
    },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Table construction or serialization error
    #[error("Table error: {0}")]
    Table(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
