//! Error types for chatflow
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for chatflow operations
///
/// Covers credential gating, remote provider failures, JSON parsing of
/// model output, invalid user input, and the ambient startup concerns
/// (configuration, IO, serialization).
#[derive(Error, Debug)]
pub enum ChatflowError {
    /// Missing or unusable API credential
    #[error("Credential error: {0}")]
    Credential(String),

    /// Remote provider failure (network, unexpected status, malformed body)
    #[error("Provider error: {0}")]
    Remote(String),

    /// The provider rejected the credential (401/403)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The provider rejected the request because of rate limits or quota
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Model output was expected to be JSON but did not parse
    #[error("Parse error: {0}")]
    Parse(String),

    /// User-supplied input was rejected (empty prompt, invalid upload, no document)
    #[error("Invalid input: {0}")]
    Input(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of [`ChatflowError`]
///
/// Controllers only care about which of these buckets a failure falls in;
/// every remote failure is handled the same way regardless of cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid secret
    Credential,
    /// Network, authentication, quota, or provider response failure
    Remote,
    /// Response text was not valid JSON
    Parse,
    /// Invalid user input or missing precondition
    Input,
    /// Startup and environment errors
    Internal,
}

impl ChatflowError {
    /// Classify this error into its [`ErrorKind`]
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::error::{ChatflowError, ErrorKind};
    ///
    /// let err = ChatflowError::RateLimited("slow down".to_string());
    /// assert_eq!(err.kind(), ErrorKind::Remote);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Credential(_) => ErrorKind::Credential,
            Self::Remote(_) | Self::Authentication(_) | Self::RateLimited(_) => ErrorKind::Remote,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Input(_) => ErrorKind::Input,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => ErrorKind::Internal,
        }
    }
}

/// Classify an `anyhow::Error` produced anywhere in the crate
///
/// Errors that did not originate from [`ChatflowError`] are reported as
/// [`ErrorKind::Internal`].
pub fn error_kind(err: &anyhow::Error) -> ErrorKind {
    err.downcast_ref::<ChatflowError>()
        .map(ChatflowError::kind)
        .unwrap_or(ErrorKind::Internal)
}

/// Result type alias for chatflow operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
