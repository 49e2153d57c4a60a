//! Error types for fakemetrics operations.
//!
//! Boundary failures (loading, persisting) carry the offending path; data
//! shape violations carry the column and row that broke the contract.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fakemetrics operations.
///
/// # Examples
///
/// ```
/// use fakemetrics::error::MetricsError;
///
/// let err = MetricsError::MissingColumn {
///     name: "views".to_string(),
/// };
/// assert!(err.to_string().contains("views"));
/// ```
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A source file exists but could not be read or parsed.
    #[error("Failed to load dataset from {}: {message}", path.display())]
    Load {
        /// File that failed to load
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// A dataset could not be written to disk.
    ///
    /// The data sources only report this through the observer; the
    /// in-memory dataset is still returned.
    #[error("Failed to persist dataset to {}: {message}", path.display())]
    Persist {
        /// Destination that failed
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// Input that cannot be processed meaningfully (empty, constant column).
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A required column is absent.
    #[error("Missing column: {name}")]
    MissingColumn {
        /// Column name
        name: String,
    },

    /// A required value is missing.
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue {
        /// Column name
        column: String,
        /// Zero-based row index
        row: usize,
    },

    /// Operation not allowed in the dataset's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Matrix/column dimensions don't match for the operation.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with string message.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for MetricsError {
    fn from(msg: &str) -> Self {
        MetricsError::Other(msg.to_string())
    }
}

impl From<String> for MetricsError {
    fn from(msg: String) -> Self {
        MetricsError::Other(msg)
    }
}

impl MetricsError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::DegenerateInput(format!("empty input: {context}"))
    }

    /// Create an invalid hyperparameter error
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl ToString, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, MetricsError>;
