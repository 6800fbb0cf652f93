//! Domain errors

use thiserror::Error;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Handler failure: {0}")]
    HandlerFailure(String),

    #[error("Invalid workflow: {0}")]
    InvalidWorkflow(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error raised by user-supplied call hooks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<HandlerError> for DomainError {
    fn from(err: HandlerError) -> Self {
        DomainError::HandlerFailure(err.message)
    }
}
