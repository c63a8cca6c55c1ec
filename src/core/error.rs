//! Error types for RON data loading.

use thiserror::Error;

/// Errors that can occur when loading spell or enemy data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// Directory or file could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// File parsed but describes something the game cannot use.
    #[error("Invalid definition in '{path}': {reason}")]
    InvalidDefinition { path: String, reason: String },
}
