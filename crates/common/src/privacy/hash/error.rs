use thiserror::Error;

/// Salt and configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("Salt generation failed: {0}")]
    SaltGeneration(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type for hashing operations
pub type HashResult<T> = Result<T, HashError>;
