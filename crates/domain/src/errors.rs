//! Error types used throughout the application

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Complimask
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum MaskError {
    /// Policy or service configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied a malformed request.
    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    /// A named resource (usually a mask pattern) does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// A suggestion provider failed. Never escapes the suggestion chain.
    #[error("Suggestion provider '{provider}' failed: {message}")]
    SuggestionProvider { provider: String, message: String },

    /// The decision cache backend failed. Callers treat this as a miss.
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl MaskError {
    /// Build a validation error for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Build a not-found error for a named resource.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into(), id: id.into() }
    }

    /// Build a provider error.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SuggestionProvider { provider: provider.into(), message: message.into() }
    }

    /// Severity used when reporting the error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(_) => ErrorSeverity::Critical,
            Self::Validation { .. } | Self::NotFound { .. } => ErrorSeverity::Info,
            Self::SuggestionProvider { .. } | Self::Cache(_) => ErrorSeverity::Warning,
            Self::Internal(_) => ErrorSeverity::Error,
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SuggestionProvider { .. } | Self::Cache(_))
    }

    /// Whether the caller is at fault (400-class at a transport boundary).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }

    /// Stable label suitable for logging fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::SuggestionProvider { .. } => "suggestion_provider",
            Self::Cache(_) => "cache",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for MaskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization failed: {err}"))
    }
}

/// Result type alias for Complimask operations
pub type Result<T> = std::result::Result<T, MaskError>;
