//! Environment-specific encoding and display resolution
//!
//! The environment is decided once, when the gallery is built, and carried as
//! a [`Strategy`] value. Everything that differs between a native device and
//! a browser-only runtime lives here.

use crate::config::{Config, Environment};
use crate::encoding::{as_base64_text, convert_file_src, data_uri, media_type_for, to_base64};
use crate::gallery::GalleryError;
use crate::photo::PhotoRecord;
use crate::ports::blob::{BlobScope, BlobStorePort};
use crate::ports::capture::{CapturePort, CapturedPhoto};
use tracing::{debug, warn};

/// Strategy for runtimes with direct file-system access
#[derive(Debug, Clone)]
pub struct NativeStrategy {
    webview_server_url: String,
}

impl NativeStrategy {
    /// Creates a native strategy that serves files through `webview_server_url`
    pub fn new(webview_server_url: impl Into<String>) -> Self {
        Self {
            webview_server_url: webview_server_url.into(),
        }
    }

    async fn encode<B>(&self, photo: &CapturedPhoto, blobs: &B) -> Result<Vec<u8>, GalleryError>
    where
        B: BlobStorePort + ?Sized,
    {
        if let Some(path) = &photo.device_path {
            return blobs.read(path, BlobScope::Device).await.map_err(|e| {
                GalleryError::EncodeUnavailable(format!("cannot read device file {}: {}", path, e))
            });
        }

        photo.inline_bytes().map(<[u8]>::to_vec).ok_or_else(|| {
            GalleryError::EncodeUnavailable("capture produced no device path".to_string())
        })
    }

    fn build_record(&self, confirmed_path: String) -> PhotoRecord {
        let display_reference = convert_file_src(&confirmed_path, &self.webview_server_url);
        PhotoRecord::resolved(confirmed_path, display_reference)
    }
}

/// Strategy for browser-only runtimes
#[derive(Debug, Clone)]
pub struct BrowserStrategy {
    /// Used when a storage name carries no extension
    fallback_media_type: String,
}

impl BrowserStrategy {
    /// Creates a browser strategy; data references take their media type
    /// from the storage name's extension, else `media_type`
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            fallback_media_type: media_type.into(),
        }
    }

    async fn encode<C>(&self, photo: &CapturedPhoto, capture: &C) -> Result<Vec<u8>, GalleryError>
    where
        C: CapturePort + ?Sized,
    {
        let raw = if let Some(bytes) = photo.inline_bytes() {
            bytes.to_vec()
        } else if let Some(reference) = photo.transient_reference() {
            capture.resolve(reference).await.map_err(|e| {
                GalleryError::EncodeUnavailable(format!("cannot fetch {}: {}", reference, e))
            })?
        } else {
            return Err(GalleryError::EncodeUnavailable(
                "capture produced no resolvable reference".to_string(),
            ));
        };

        Ok(to_base64(&raw).into_bytes())
    }

    fn build_record(&self, file_name: &str, photo: &CapturedPhoto, encoded: &[u8]) -> PhotoRecord {
        let display_reference = match photo.transient_reference() {
            Some(reference) => reference.to_string(),
            None => data_uri(
                &media_type_for(file_name, &self.fallback_media_type),
                &String::from_utf8_lossy(encoded),
            ),
        };
        PhotoRecord::resolved(file_name, display_reference)
    }

    async fn resolve_display<B>(&self, photos: Vec<PhotoRecord>, blobs: &B) -> Vec<PhotoRecord>
    where
        B: BlobStorePort + ?Sized,
    {
        let mut resolved = Vec::with_capacity(photos.len());
        for mut photo in photos {
            let media_type = media_type_for(&photo.storage_path, &self.fallback_media_type);
            photo.display_reference = match blobs.read(&photo.storage_path, BlobScope::Data).await {
                Ok(data) => Some(data_uri(&media_type, &as_base64_text(&data))),
                Err(e) => {
                    warn!("Cannot resolve photo {}: {}", photo.storage_path, e);
                    None
                }
            };
            resolved.push(photo);
        }
        resolved
    }
}

/// Encoding and resolution strategy, selected by environment
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Raw bytes on disk, displayed through the webview file server
    Native(NativeStrategy),
    /// Base64 text on disk, displayed through inline data references
    Browser(BrowserStrategy),
}

impl Strategy {
    /// Builds the strategy for the configured environment
    pub fn from_config(config: &Config) -> Self {
        match config.environment.mode {
            Environment::Native => Strategy::Native(NativeStrategy::new(
                config.environment.webview_server_url.clone(),
            )),
            Environment::Browser => {
                Strategy::Browser(BrowserStrategy::new(config.capture.media_type.clone()))
            }
        }
    }

    /// Returns the environment this strategy serves
    pub fn environment(&self) -> Environment {
        match self {
            Strategy::Native(_) => Environment::Native,
            Strategy::Browser(_) => Environment::Browser,
        }
    }

    /// Turns a captured photo into the bytes to store in the blob store
    ///
    /// # Errors
    /// Returns `GalleryError::EncodeUnavailable` when the capture offers no
    /// byte source this environment can use
    pub async fn encode<C, B>(
        &self,
        photo: &CapturedPhoto,
        capture: &C,
        blobs: &B,
    ) -> Result<Vec<u8>, GalleryError>
    where
        C: CapturePort + ?Sized,
        B: BlobStorePort + ?Sized,
    {
        match self {
            Strategy::Native(native) => native.encode(photo, blobs).await,
            Strategy::Browser(browser) => browser.encode(photo, capture).await,
        }
    }

    /// Builds the record for a blob written as `file_name` and confirmed at
    /// `confirmed_path`
    pub fn build_record(
        &self,
        file_name: &str,
        confirmed_path: String,
        photo: &CapturedPhoto,
        encoded: &[u8],
    ) -> PhotoRecord {
        match self {
            Strategy::Native(native) => native.build_record(confirmed_path),
            Strategy::Browser(browser) => browser.build_record(file_name, photo, encoded),
        }
    }

    /// Computes display references for a freshly loaded gallery
    ///
    /// Native records are already renderable and are returned untouched.
    /// In the browser every blob is read back; records whose blob cannot be
    /// read keep no display reference.
    pub async fn resolve_display<B>(&self, photos: Vec<PhotoRecord>, blobs: &B) -> Vec<PhotoRecord>
    where
        B: BlobStorePort + ?Sized,
    {
        match self {
            Strategy::Native(_) => {
                debug!("Native environment, skipping display resolution");
                photos
            }
            Strategy::Browser(browser) => browser.resolve_display(photos, blobs).await,
        }
    }
}
