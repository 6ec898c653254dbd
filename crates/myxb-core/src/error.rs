//! Grading configuration error types.
//!
//! A `ConfigError` is fatal: without score bands no GPA can be computed, so
//! callers propagate it and stop rather than falling back to defaults.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a grading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read grading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be deserialized.
    #[error("failed to parse grading config {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// A required band list is empty.
    #[error("score band list '{0}' is empty")]
    EmptyBands(String),

    /// A band has impossible bounds or a non-finite GPA.
    #[error("invalid band #{index} in '{list}': {reason}")]
    InvalidBand {
        list: String,
        index: usize,
        reason: String,
    },
}
