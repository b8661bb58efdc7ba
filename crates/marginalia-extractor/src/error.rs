//! Error types for the Extractor

use thiserror::Error;

/// Errors that abort a pipeline run
///
/// Per-record anomalies (malformed blocks, unreadable dates, unmatched
/// notes) are not errors; they are collected in
/// [`Diagnostics`](crate::Diagnostics) instead.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Input exceeds the configured maximum size
    #[error("Input too large: {0} bytes (max: {1})")]
    InputTooLarge(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
