//! Error types for the weldcheck inference pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for weldcheck operations
pub type Result<T> = std::result::Result<T, WeldError>;

/// Main error type for the weldcheck pipeline
///
/// Startup errors (`ConfigError`, `MissingFile`) abort the run. Per-record
/// errors (`SchemaMismatch`, `MalformedValue`, `MissingOutput`) fail only the
/// prediction they occurred in; batch callers catch and report them per row.
#[derive(Error, Debug)]
pub enum WeldError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("File not found: {name} (searched {searched:?})")]
    MissingFile { name: String, searched: Vec<PathBuf> },

    #[error("Schema mismatch: column '{0}' missing from record")]
    SchemaMismatch(String),

    #[error("Malformed value in column '{column}': {value:?}")]
    MalformedValue { column: String, value: String },

    #[error("Missing model output: {0}")]
    MissingOutput(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for WeldError {
    fn from(err: polars::error::PolarsError) -> Self {
        WeldError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for WeldError {
    fn from(err: serde_json::Error) -> Self {
        WeldError::SerializationError(err.to_string())
    }
}

impl WeldError {
    /// Whether this error aborts the whole run rather than a single prediction
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WeldError::ConfigError(_) | WeldError::MissingFile { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WeldError::SchemaMismatch("AnomalyScore".to_string());
        assert_eq!(
            err.to_string(),
            "Schema mismatch: column 'AnomalyScore' missing from record"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(WeldError::ConfigError("bad threshold".into()).is_fatal());
        assert!(!WeldError::MissingOutput("output_label".into()).is_fatal());
        assert!(!WeldError::MalformedValue {
            column: "MaxVal".into(),
            value: "oops".into()
        }
        .is_fatal());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WeldError = io_err.into();
        assert!(matches!(err, WeldError::IoError(_)));
    }
}
