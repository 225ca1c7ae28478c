/*!
 * Error types for the scriptparse application.
 *
 * Each stage of the pipeline has its own error type, defined with thiserror.
 * Underlying causes are kept as `source()` so diagnostics are never lost.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::screenplay::FormatTag;

/// Boxed error coming from a page source implementation
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while turning a document into raw screenplay text
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document could not be opened or read
    #[error("Failed to open document {path:?}: {source}")]
    Open {
        /// Path of the document
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The document was read but its content could not be decoded
    #[error("Failed to extract document text: {source}")]
    Decode {
        /// Error reported by the extraction backend
        #[source]
        source: SourceError,
    },
}

/// No parser is registered for the requested dialect
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported screenplay format: '{tag}'")]
pub struct UnsupportedFormatError {
    /// The tag that could not be resolved
    pub tag: FormatTag,
}

/// Structural failure while parsing a screenplay
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input cannot be a screenplay in this dialect at all
    #[error("Malformed {format} screenplay: {message}")]
    Malformed {
        /// Dialect that rejected the input
        format: FormatTag,
        /// Human readable diagnostic
        message: String,
    },
}

/// Errors raised while writing or reading a persisted mapping
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Filesystem failure
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failure
    #[error("JSON error on {path:?}: {source}")]
    Json {
        /// Target path
        path: PathBuf,
        /// Underlying serde_json failure
        #[source]
        source: serde_json::Error,
    },
}

/// Failures that the parsing pipeline passes through unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The detected dialect has no parser
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    /// The parser rejected the input
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Document could not be read
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Dialect has no parser
    #[error("Format error: {0}")]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    /// Parser rejected the input
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Result could not be written
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Error from a file operation outside the pipeline
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Stable process exit code for each error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Extraction(_) => 2,
            Self::UnsupportedFormat(_) => 3,
            Self::Parse(_) => 4,
            Self::Persistence(_) => 5,
            Self::File(_) | Self::Unknown(_) => 1,
        }
    }
}

impl From<ScriptError> for AppError {
    fn from(error: ScriptError) -> Self {
        match error {
            ScriptError::UnsupportedFormat(e) => Self::UnsupportedFormat(e),
            ScriptError::Parse(e) => Self::Parse(e),
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
