use async_trait::async_trait;
use gallery_core::ports::capture::{CaptureError, CapturePort, CapturedPhoto, PhotoSource};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const FILE_SCHEME: &str = "file://";
const DEFAULT_FORMAT: &str = "jpeg";

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Bytes { data: Vec<u8>, format: String },
}

/// Capture device that "takes" a photo by importing an existing image
///
/// A file origin behaves like a camera that wrote the shot to device
/// storage: the result carries the device path plus a `file://` reference
/// resolvable through [`CapturePort::resolve`]. A byte origin behaves like a
/// camera that hands the image over inline.
#[derive(Debug, Clone)]
pub struct FileCaptureAdapter {
    origin: Origin,
}

impl FileCaptureAdapter {
    /// Imports the image file at `path`
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::File(path.into()),
        }
    }

    /// Imports image bytes already in memory (e.g. read from stdin)
    pub fn from_bytes(data: Vec<u8>, format: impl Into<String>) -> Self {
        Self {
            origin: Origin::Bytes {
                data,
                format: format.into(),
            },
        }
    }

    async fn capture_file(path: &Path) -> Result<CapturedPhoto, CaptureError> {
        let absolute = tokio::fs::canonicalize(path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    CaptureError::DeviceFailed(format!("No image at {}", path.display()))
                }
                _ => CaptureError::IoError(e),
            })?;

        let metadata = tokio::fs::metadata(&absolute).await?;
        if !metadata.is_file() {
            return Err(CaptureError::DeviceFailed(format!(
                "{} is not a file",
                absolute.display()
            )));
        }
        if metadata.len() == 0 {
            return Err(CaptureError::DeviceFailed(format!(
                "{} is empty",
                absolute.display()
            )));
        }

        let device_path = absolute.to_string_lossy().to_string();
        info!("Imported {} ({} bytes)", device_path, metadata.len());

        Ok(CapturedPhoto {
            source: Some(PhotoSource::Transient(format!(
                "{}{}",
                FILE_SCHEME, device_path
            ))),
            format: format_from_extension(&absolute),
            device_path: Some(device_path),
        })
    }
}

fn format_from_extension(path: &Path) -> String {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
    {
        Some(ext) if ext == "jpg" => DEFAULT_FORMAT.to_string(),
        Some(ext) if !ext.is_empty() => ext,
        _ => DEFAULT_FORMAT.to_string(),
    }
}

#[async_trait]
impl CapturePort for FileCaptureAdapter {
    async fn capture_photo(&self) -> Result<CapturedPhoto, CaptureError> {
        match &self.origin {
            Origin::File(path) => Self::capture_file(path).await,
            Origin::Bytes { data, .. } if data.is_empty() => {
                Err(CaptureError::DeviceFailed("No image data supplied".to_string()))
            }
            Origin::Bytes { data, format } => {
                debug!("Captured {} inline bytes", data.len());
                Ok(CapturedPhoto {
                    source: Some(PhotoSource::Inline(data.clone())),
                    device_path: None,
                    format: format.clone(),
                })
            }
        }
    }

    async fn resolve(&self, reference: &str) -> Result<Vec<u8>, CaptureError> {
        let path = reference.strip_prefix(FILE_SCHEME).ok_or_else(|| {
            CaptureError::DeviceFailed(format!("Unsupported reference: {}", reference))
        })?;
        Ok(tokio::fs::read(path).await?)
    }
}
