//! Common error types for snapfeed
//!
//! Domain-specific errors live next to their ports and modules and are
//! re-exported here, together with the top-level wrapper used at the
//! application boundary.

use thiserror::Error;

// Re-export domain-specific errors
pub use crate::coordinator::SubmitError;
pub use crate::logging::LoggerError;
pub use crate::ports::board::BoardError;
pub use crate::ports::capture::CaptureError;

/// Top-level error type for snapfeed operations
///
/// Wraps all domain-specific errors with automatic conversion via `From`,
/// enabling seamless propagation with `?`.
#[derive(Debug, Error)]
pub enum SnapfeedError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Screenshot capture errors
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Remote board errors
    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    /// Submission errors
    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),

    /// Logger errors
    #[error("Logger error: {0}")]
    Logger(#[from] LoggerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Parse error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
