//! Error types for sqlargs

use thiserror::Error;

/// Result type for sqlargs operations.
pub type CheckResult<T> = Result<T, CheckError>;

/// Error type for loading host facts.
///
/// The analysis itself never fails: calls it cannot reason about are skipped.
/// These errors only come from decoding or validating a fact file.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Fact file is not valid JSON or does not match the fact model.
    #[error("Fact decode error: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading a fact source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Facts decoded but are inconsistent (e.g. duplicate expression ids).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CheckError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CheckError::Validation(message.into())
    }
}
