//! Error types for essential-toc.

use thiserror::Error;

/// Unified error type for TOC operations.
#[derive(Debug, Error)]
pub enum TocError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read or write TOC data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A location string could not be parsed as a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// TOC data is structurally invalid
    #[error("Invalid TOC data: {0}")]
    InvalidToc(String),
}
