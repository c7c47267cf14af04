//! Error types for the attribute gateway
//!
//! These cover process-level failures (configuration, I/O, server startup).
//! Per-request failures never surface here; the write pipeline turns them
//! into structured API responses, see [`crate::attributes::ApiError`].

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the attribute gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Device address could not be parsed
    #[error("invalid device address: {0}")]
    InvalidAddress(String),

    /// Device registration conflicts with an existing entry
    #[error("duplicate device: {0}")]
    DuplicateDevice(String),

    /// HTTP server error
    #[error("server error: {0}")]
    Server(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
