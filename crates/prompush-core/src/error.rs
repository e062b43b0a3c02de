//! Error types for prompush-core

use thiserror::Error;

/// Core error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Empty metric name")]
    EmptyMetricName,

    #[error("Empty label name")]
    EmptyLabelName,

    #[error("Reserved label name: {0}")]
    ReservedLabelName(String),

    #[error("Duplicate label name: {0}")]
    DuplicateLabelName(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
