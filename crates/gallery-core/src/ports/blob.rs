//! Blob store port definition

use async_trait::async_trait;
use thiserror::Error;

/// Addressing scope for blob paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobScope {
    /// Relative to the application-private data directory
    Data,
    /// An unscoped device-local path (absolute path or `file://` URI)
    Device,
}

/// Errors that can occur during blob operations
#[derive(Debug, Error)]
pub enum BlobError {
    /// No blob exists at the path
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// The path cannot be used in the requested scope
    #[error("Invalid blob path: {0}")]
    InvalidPath(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Port for byte-addressable photo storage
#[async_trait]
pub trait BlobStorePort: Send + Sync {
    /// Write `data` at `path`, replacing any existing blob
    ///
    /// Returns the confirmed location of the blob, which may differ from
    /// `path` (for example a fully qualified `file://` URI).
    async fn write(&self, path: &str, data: &[u8], scope: BlobScope) -> Result<String, BlobError>;

    /// Read the blob stored at `path`
    ///
    /// # Errors
    /// Returns `BlobError::NotFound` if nothing is stored there
    async fn read(&self, path: &str, scope: BlobScope) -> Result<Vec<u8>, BlobError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_error_display() {
        let err = BlobError::NotFound("missing.jpeg".to_string());
        assert!(err.to_string().contains("missing.jpeg"));

        let err = BlobError::InvalidPath("../escape".to_string());
        assert!(err.to_string().contains("../escape"));
    }
}
