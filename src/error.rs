use thiserror::Error;
use validator::ValidationErrors;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::InvalidInput(format!("validation failed: {}", err))
    }
}
