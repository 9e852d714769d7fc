//! Error types for formrelay.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur when submitting to the form relay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Transport-level failure reaching the relay
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Relay rejected the submission
    #[error("Relay rejected submission (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Relay returned a server-side failure
    #[error("Relay server error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Relay response body could not be parsed
    #[error("Invalid relay response: {0}")]
    InvalidResponse(String),

    /// Access key for the relay is not configured
    #[error("Relay access key is not configured")]
    MissingAccessKey,

    /// Generic relay error with context
    #[error("Relay error: {0}")]
    Other(String),
}

/// Errors that can occur when reading or writing the key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read a stored value
    #[error("Failed to read key '{key}': {reason}")]
    ReadFailed { key: String, reason: String },

    /// Failed to write a value
    #[error("Failed to write key '{key}': {reason}")]
    WriteFailed { key: String, reason: String },

    /// Failed to remove a stored value
    #[error("Failed to remove key '{key}': {reason}")]
    RemoveFailed { key: String, reason: String },
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Convenience type alias for Results with RelayError
pub type RelayResult<T> = Result<T, RelayError>;

/// Convenience type alias for Results with StorageError
pub type StorageResult<T> = Result<T, StorageError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
