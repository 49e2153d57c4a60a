//! Error types for the fakemetrics CLI

use fakemetrics::MetricsError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Dataset present but unreadable
    #[error("{0}")]
    Load(String),

    /// Bad configuration file or parameter
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Data that cannot be standardized or scored
    #[error("{0}")]
    Degenerate(String),

    /// Any other pipeline failure
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Output serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Numeric status for this error class
    pub(crate) fn code(&self) -> u8 {
        match self {
            Self::Pipeline(_) => 1,
            Self::FileNotFound(_) => 3,
            Self::Load(_) => 4,
            Self::Config(_) => 5,
            Self::Degenerate(_) => 6,
            Self::Json(_) => 7,
        }
    }

    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

impl From<MetricsError> for CliError {
    fn from(e: MetricsError) -> Self {
        match e {
            MetricsError::Load { .. } => Self::Load(e.to_string()),
            MetricsError::Config(msg) => Self::Config(msg),
            MetricsError::InvalidHyperparameter { .. } => Self::Config(e.to_string()),
            MetricsError::DegenerateInput(_) => Self::Degenerate(e.to_string()),
            other => Self::Pipeline(other.to_string()),
        }
    }
}
