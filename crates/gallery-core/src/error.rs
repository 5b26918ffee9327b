//! Common error types for the gallery
//!
//! Port-specific errors are defined in their port modules and re-exported
//! here together with the top-level `AppError`.

use thiserror::Error;

pub use crate::gallery::{GalleryError, PersistStage};
pub use crate::logging::LoggerError;
pub use crate::ports::blob::BlobError;
pub use crate::ports::capture::CaptureError;
pub use crate::ports::index::IndexError;

/// Top-level error type for gallery operations
///
/// Wraps all domain-specific errors with `From` conversions so they can be
/// propagated with `?`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Capture device errors
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Blob store errors
    #[error("Blob store error: {0}")]
    Blob(#[from] BlobError),

    /// Index store errors
    #[error("Index store error: {0}")]
    Index(#[from] IndexError),

    /// Gallery service errors
    #[error("Gallery error: {0}")]
    Gallery(#[from] GalleryError),

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
