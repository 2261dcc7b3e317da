//! Unified error types for the graphedexcel workspace.
//!
//! Library crates return [`Result`]; the binaries wrap it in `anyhow` with
//! additional context.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum GraphedExcelError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The workbook could not be opened or a sheet could not be read.
    #[error("cannot read workbook {path}: {message}")]
    Workbook {
        /// Path of the workbook.
        path: PathBuf,
        /// Description reported by the reader.
        message: String,
    },

    /// A formula could not be tokenized.
    #[error("malformed formula {formula:?}: {message}")]
    Formula {
        /// The formula text.
        formula: String,
        /// Description of the problem.
        message: String,
    },

    /// A cell address or reference string is not valid.
    #[error("invalid cell address: {input:?}")]
    InvalidAddress {
        /// The rejected input.
        input: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl GraphedExcelError {
    /// Builds an [`GraphedExcelError::Io`] for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GraphedExcelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_path() {
        let err = GraphedExcelError::io(
            "/tmp/Book1.xlsx",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/Book1.xlsx"), "got: {msg}");
        assert!(msg.contains("missing"), "got: {msg}");
    }

    #[test]
    fn invalid_address_quotes_input() {
        let err = GraphedExcelError::InvalidAddress {
            input: "ZZZZ1".into(),
        };
        assert_eq!(err.to_string(), "invalid cell address: \"ZZZZ1\"");
    }
}
