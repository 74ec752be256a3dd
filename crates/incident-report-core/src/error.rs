//! # Error Module
//!
//! Whole-input failures of the core pipeline.
//!
//! Row-level problems are not errors; see [`crate::Rejection`].

use thiserror::Error;

/// Errors produced by the core pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The CSV reader could not make sense of an extract.
    #[error("malformed extract {file}: {message}")]
    Csv { file: String, message: String },

    /// The extract has no header row.
    #[error("extract {file} is empty (no header row)")]
    EmptyExtract { file: String },

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias for the core pipeline.
pub type Result<T> = std::result::Result<T, ReportError>;
