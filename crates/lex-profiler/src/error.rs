//! Custom error types for the profiler.
//!
//! This module provides the error hierarchy using `thiserror`. Errors split
//! into two groups: table-level failures that abort a profiling run, and
//! column-level failures that are isolated to the offending column.
//!
//! Errors are serializable so they can be embedded in JSON reports.

use crate::types::ColumnKind;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for profiling operations.
#[derive(Error, Debug)]
pub enum ProfilingError {
    /// The table has no rows or no columns.
    #[error("Cannot profile an empty table ({rows} rows x {columns} columns)")]
    EmptyTable { rows: usize, columns: usize },

    /// A column cannot yield statistics for its declared kind.
    #[error("Column '{column}' cannot be profiled: {reason}")]
    UnprofilableColumn { column: String, reason: String },

    /// A column's values do not match its declared kind.
    #[error("Column '{column}' is declared {declared} but {detail}")]
    InvalidColumnKind {
        column: String,
        declared: ColumnKind,
        detail: String,
    },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input file format is not supported by the loader.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProfilingError>,
    },
}

impl ProfilingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProfilingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for report consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTable { .. } => "EMPTY_TABLE",
            Self::UnprofilableColumn { .. } => "UNPROFILABLE_COLUMN",
            Self::InvalidColumnKind { .. } => "INVALID_COLUMN_KIND",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is confined to a single column.
    ///
    /// Column-level errors are recorded against the column and never abort
    /// profiling of the remaining columns.
    pub fn is_column_level(&self) -> bool {
        match self {
            Self::UnprofilableColumn { .. } | Self::InvalidColumnKind { .. } => true,
            Self::WithContext { source, .. } => source.is_column_level(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProfilingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProfilingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for profiling operations.
pub type Result<T> = std::result::Result<T, ProfilingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProfilingError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ProfilingError::EmptyTable {
                rows: 0,
                columns: 3
            }
            .error_code(),
            "EMPTY_TABLE"
        );
        assert_eq!(
            ProfilingError::ColumnNotFound("fare_amount".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_column_level() {
        let invalid = ProfilingError::InvalidColumnKind {
            column: "fare_amount".to_string(),
            declared: ColumnKind::Numeric,
            detail: "contains non-numeric token 'abc'".to_string(),
        };
        assert!(invalid.is_column_level());
        assert!(
            ProfilingError::UnprofilableColumn {
                column: "x".to_string(),
                reason: "all values are null".to_string()
            }
            .is_column_level()
        );
        assert!(
            !ProfilingError::EmptyTable {
                rows: 0,
                columns: 0
            }
            .is_column_level()
        );
    }

    #[test]
    fn test_invalid_kind_message() {
        let error = ProfilingError::InvalidColumnKind {
            column: "Quantity".to_string(),
            declared: ColumnKind::Numeric,
            detail: "contains non-numeric token 'ten'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Column 'Quantity' is declared numeric but contains non-numeric token 'ten'"
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = ProfilingError::ColumnNotFound("tip_amount".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("tip_amount"));
    }

    #[test]
    fn test_with_context() {
        let error = ProfilingError::ColumnNotFound("test".to_string()).with_context("During profiling");
        assert!(error.to_string().contains("During profiling"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(!error.is_column_level());
    }
}
