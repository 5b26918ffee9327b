//! Capture device port definition

use async_trait::async_trait;
use thiserror::Error;

/// Where the bytes of a freshly captured photo can be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSource {
    /// The device handed the image bytes over directly
    Inline(Vec<u8>),
    /// A short-lived reference (e.g. an object URL) resolvable through
    /// [`CapturePort::resolve`]
    Transient(String),
}

/// Result of a capture operation
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    /// Byte source, if the device produced a usable one
    pub source: Option<PhotoSource>,
    /// Device-local path of the captured file, when the device wrote one
    pub device_path: Option<String>,
    /// Image format reported by the device (e.g. "jpeg")
    pub format: String,
}

impl CapturedPhoto {
    /// Returns the transient reference, if the source is one
    pub fn transient_reference(&self) -> Option<&str> {
        match &self.source {
            Some(PhotoSource::Transient(reference)) => Some(reference),
            _ => None,
        }
    }

    /// Returns the inline bytes, if the device supplied them directly
    pub fn inline_bytes(&self) -> Option<&[u8]> {
        match &self.source {
            Some(PhotoSource::Inline(bytes)) => Some(bytes),
            _ => None,
        }
    }
}

/// Errors that can occur during capture operations
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The user dismissed the capture
    #[error("Capture cancelled by user")]
    Cancelled,

    /// The device reported a failure
    #[error("Capture device failed: {0}")]
    DeviceFailed(String),

    /// IO error while talking to the device
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Port for the photo capture device
#[async_trait]
pub trait CapturePort: Send + Sync {
    /// Capture a single photo
    ///
    /// Suspends until the user completes or cancels the capture. Cancellation
    /// is reported as `CaptureError::Cancelled`.
    async fn capture_photo(&self) -> Result<CapturedPhoto, CaptureError>;

    /// Fetch the bytes behind a transient reference returned by `capture_photo`
    async fn resolve(&self, reference: &str) -> Result<Vec<u8>, CaptureError>;
}
