//! Error handling module for siteup
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All errors in the application should use these types for consistency.

#![allow(dead_code)] // Error variants and helpers are available for future use

use thiserror::Error;

/// Main error type for siteup
#[derive(Error, Debug)]
pub enum SiteupError {
    /// IO errors (file operations, staging writes, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, environment overrides)
    #[error("Configuration error: {0}")]
    Config(String),

    /// External command failures (apt, git, systemctl, ...)
    #[error("Command failed: {0}")]
    Command(String),

    /// Validation errors (domain names, ports, user input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// System errors (missing binaries, privilege problems)
    #[error("System error: {0}")]
    System(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for siteup operations
pub type Result<T> = std::result::Result<T, SiteupError>;

// Convenient error constructors
impl SiteupError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an external command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a system error
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}
