//! Error handling for GameHub
//!
//! This module defines the main error types used throughout the catalog
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the GameHub catalog
#[derive(Error, Debug)]
pub enum GameHubError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised by an event source while fetching records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Event API request failed: {0}")]
    RequestFailed(String),

    #[error("Event API timeout")]
    Timeout,

    #[error("Invalid event API response: {0}")]
    InvalidResponse(String),

    #[error("Event API unavailable")]
    ServiceUnavailable,

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),
}

/// Result type alias for GameHub operations
pub type Result<T> = std::result::Result<T, GameHubError>;

/// Result type alias for event source operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

impl GameHubError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            GameHubError::Config(_) => false,
            GameHubError::Fetch(e) => e.is_recoverable(),
            GameHubError::Http(_) => true,
            GameHubError::Serialization(_) => false,
            GameHubError::Io(_) => true,
            GameHubError::UrlParse(_) => false,
            GameHubError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GameHubError::Config(_) => ErrorSeverity::Critical,
            GameHubError::UrlParse(_) => ErrorSeverity::Critical,
            GameHubError::Fetch(FetchError::Unauthorized(_)) => ErrorSeverity::Warning,
            GameHubError::Fetch(FetchError::NotFound(_)) => ErrorSeverity::Info,
            GameHubError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

impl FetchError {
    /// Transient failures are worth retrying by the caller
    pub fn is_recoverable(&self) -> bool {
        match self {
            FetchError::RequestFailed(_) => true,
            FetchError::Timeout => true,
            FetchError::ServiceUnavailable => true,
            FetchError::InvalidResponse(_) => false,
            FetchError::NotFound(_) => false,
            FetchError::Unauthorized(_) => false,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
