//! Error taxonomy for Computer Doctor.
//!
//! Only loading and configuration can fail. Runtime diagnostic paths
//! (unknown selections, superseded scans) are represented as values.

/// Errors raised while building a knowledge base or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("unknown component id: {0}")]
    UnknownComponent(String),

    #[error("duplicate component id in knowledge base: {0}")]
    DuplicateComponent(String),

    #[error("fault record {id} has an empty {field}")]
    EmptyField { id: String, field: &'static str },

    #[error("fault record {0} has no remediation steps")]
    NoSolutions(String),

    #[error("percentage out of range (0-100): {0}")]
    PercentOutOfRange(String),

    #[error("no tokio runtime available to schedule scans")]
    NoRuntime,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Computer Doctor operations.
pub type Result<T> = std::result::Result<T, DoctorError>;
