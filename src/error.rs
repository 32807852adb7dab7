//! Error handling module
//!
//! Provides unified error types for the entire relay.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Malformed command: {0}")]
    MalformedCommand(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Remote call '{method}' timed out after {seconds}s")]
    Timeout { method: String, seconds: u64 },

    #[error("Proposal {0} not found")]
    NotFound(u64),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Helper function to create a malformed-command error
pub fn malformed_command(msg: impl Into<String>) -> RelayError {
    RelayError::MalformedCommand(msg.into())
}

/// Helper function to create a transport error
pub fn transport_error(msg: impl Into<String>) -> RelayError {
    RelayError::Transport(msg.into())
}

/// Helper function to create a configuration error
pub fn config_error(msg: impl Into<String>) -> RelayError {
    RelayError::Config(msg.into())
}
