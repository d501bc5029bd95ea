//! Error types for the equalization pipeline

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum AeqError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("data missing: {0}")]
    DataMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias
pub type AeqResult<T> = Result<T, AeqError>;
