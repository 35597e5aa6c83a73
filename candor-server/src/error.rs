//! Server error types

use thiserror::Error;

/// Errors that can occur in the candor server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}
