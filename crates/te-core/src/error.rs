//! Error types for TrigEff

use thiserror::Error;

/// TrigEff error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed numeric arguments: bad binning, inverted ranges,
    /// mismatched paired-array lengths, missing columns.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Inconsistent scan configuration, detected before any computation.
    #[error("Configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    /// A configuration's sample table has no events.
    #[error("Empty {sample} sample for configuration '{label}'")]
    EmptySample {
        /// Label of the offending configuration.
        label: String,
        /// Sample kind ("signal" or "background").
        sample: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
