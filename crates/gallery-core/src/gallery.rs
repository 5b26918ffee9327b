//! Photo gallery service
//!
//! Owns the ordered in-memory gallery (newest first) and keeps it in step
//! with the blob store and the index store.
//!
//! Operations are expected to be invoked one at a time. Overlapping
//! `capture`/`load` calls are not serialized here: the last write to the
//! in-memory list and to the index store wins.

use crate::config::{Config, Environment};
use crate::encoding::format_extension;
use crate::photo::{decode_index, encode_index, PhotoRecord};
use crate::ports::blob::{BlobScope, BlobStorePort};
use crate::ports::capture::{CaptureError, CapturePort};
use crate::ports::index::{IndexError, IndexStorePort};
use crate::strategy::Strategy;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Durable write that failed after the capture was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStage {
    /// Writing the image bytes to the blob store
    Blob,
    /// Writing the serialized gallery to the index store
    Index,
}

impl std::fmt::Display for PersistStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistStage::Blob => write!(f, "blob"),
            PersistStage::Index => write!(f, "index"),
        }
    }
}

/// Errors that can occur during gallery operations
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The user cancelled the capture or the device failed
    #[error("Capture aborted: {0}")]
    CaptureAborted(#[from] CaptureError),

    /// The capture offered no byte source usable in this environment
    #[error("No usable image source: {0}")]
    EncodeUnavailable(String),

    /// A durable write failed. For `PersistStage::Index` the new photo is
    /// already in the in-memory gallery and the stored index lags behind it.
    #[error("Photo not fully persisted ({stage} write failed): {message}")]
    PartialPersist {
        /// Which write failed
        stage: PersistStage,
        /// Underlying failure
        message: String,
    },

    /// The index store could not be read at all
    #[error("Failed to read gallery index: {0}")]
    IndexRead(#[from] IndexError),
}

/// State of the stored index found by `load`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// A valid index was found
    Present,
    /// No index has been stored yet
    Missing,
    /// A value was stored but could not be parsed; treated as empty
    Unreadable,
}

/// Summary of a load operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of photos in the loaded gallery
    pub photo_count: usize,
    /// Number of photos with a display reference
    pub resolved_count: usize,
    /// Storage paths of photos left without a display reference
    pub unresolved: Vec<String>,
    /// What was found in the index store
    pub index_state: IndexState,
}

/// The photo gallery service
pub struct PhotoGallery<C, B, I>
where
    C: CapturePort,
    B: BlobStorePort,
    I: IndexStorePort,
{
    capture_port: Arc<C>,
    blob_store: Arc<B>,
    index_store: Arc<I>,
    strategy: Strategy,
    index_key: String,
    /// Extension for photos whose device reports no usable format
    fallback_extension: String,
    /// Current gallery snapshot, replaced wholesale on every change
    photos: RwLock<Arc<Vec<PhotoRecord>>>,
    /// Millisecond stamp of the last generated storage name
    last_stamp: AtomicI64,
}

impl<C, B, I> PhotoGallery<C, B, I>
where
    C: CapturePort,
    B: BlobStorePort,
    I: IndexStorePort,
{
    /// Creates a gallery with an empty in-memory list
    ///
    /// The environment strategy is fixed here from `config.environment.mode`.
    pub fn new(
        capture_port: Arc<C>,
        blob_store: Arc<B>,
        index_store: Arc<I>,
        config: &Config,
    ) -> Self {
        Self {
            capture_port,
            blob_store,
            index_store,
            strategy: Strategy::from_config(config),
            index_key: config.storage.index_key.clone(),
            fallback_extension: config.capture.file_extension.clone(),
            photos: RwLock::new(Arc::new(Vec::new())),
            last_stamp: AtomicI64::new(0),
        }
    }

    /// Returns the environment the gallery was built for
    pub fn environment(&self) -> Environment {
        self.strategy.environment()
    }

    /// Returns the current gallery, newest first
    pub fn photos(&self) -> Arc<Vec<PhotoRecord>> {
        let guard = self.photos.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Captures a photo, stores it and puts it at the front of the gallery
    ///
    /// The blob is written before the index. There is no rollback: if the
    /// index write fails the photo stays in memory and
    /// `GalleryError::PartialPersist { stage: PersistStage::Index, .. }` is
    /// returned.
    ///
    /// # Errors
    /// - `CaptureAborted` if the device was cancelled or failed; nothing changes
    /// - `EncodeUnavailable` if no byte source could be used; nothing changes
    /// - `PartialPersist` with `PersistStage::Blob` if the bytes could not be
    ///   stored; nothing changes in memory or in the index
    /// - `PartialPersist` with `PersistStage::Index` as described above
    pub async fn capture(&self) -> Result<PhotoRecord, GalleryError> {
        let start = std::time::Instant::now();
        debug!("Starting capture...");

        let photo = match self.capture_port.capture_photo().await {
            Ok(photo) => photo,
            Err(CaptureError::Cancelled) => {
                info!("Capture cancelled");
                return Err(CaptureError::Cancelled.into());
            }
            Err(e) => {
                warn!("Capture device failed: {}", e);
                return Err(e.into());
            }
        };
        debug!("Photo captured in {:?}", start.elapsed());

        let data = self
            .strategy
            .encode(&photo, &*self.capture_port, &*self.blob_store)
            .await
            .inspect_err(|e| warn!("{}", e))?;

        let extension =
            format_extension(&photo.format).unwrap_or_else(|| self.fallback_extension.clone());
        let file_name = self.next_storage_name(&extension);
        let confirmed_path = self
            .blob_store
            .write(&file_name, &data, BlobScope::Data)
            .await
            .map_err(|e| {
                error!("Failed to write photo {}: {}", file_name, e);
                GalleryError::PartialPersist {
                    stage: PersistStage::Blob,
                    message: e.to_string(),
                }
            })?;
        debug!("Photo written to {} ({} bytes)", confirmed_path, data.len());

        let record = self
            .strategy
            .build_record(&file_name, confirmed_path, &photo, &data);
        let snapshot = self.prepend(record.clone());

        self.write_index(&snapshot).await?;

        info!(
            "Captured {} ({} photos) in {:?}",
            record.storage_path,
            snapshot.len(),
            start.elapsed()
        );
        Ok(record)
    }

    /// Replaces the in-memory gallery with the stored index
    ///
    /// A missing or unparseable index yields an empty gallery. In the browser
    /// environment display references are rebuilt from the stored blobs; a
    /// photo whose blob cannot be read stays in the list unresolved.
    ///
    /// # Errors
    /// Returns `GalleryError::IndexRead` only if the index store itself
    /// fails; the in-memory gallery is left as it was
    pub async fn load(&self) -> Result<LoadSummary, GalleryError> {
        let stored = self.index_store.get(&self.index_key).await.map_err(|e| {
            error!("Failed to read index {}: {}", self.index_key, e);
            GalleryError::IndexRead(e)
        })?;

        let (records, index_state) = match stored {
            Some(value) if !value.trim().is_empty() => match decode_index(&value) {
                Some(records) => (records, IndexState::Present),
                None => {
                    warn!(
                        "Stored index {} is unreadable, starting with an empty gallery",
                        self.index_key
                    );
                    (Vec::new(), IndexState::Unreadable)
                }
            },
            _ => (Vec::new(), IndexState::Missing),
        };

        let records = self
            .strategy
            .resolve_display(records, &*self.blob_store)
            .await;

        let unresolved: Vec<String> = records
            .iter()
            .filter(|photo| !photo.is_resolved())
            .map(|photo| photo.storage_path.clone())
            .collect();
        let summary = LoadSummary {
            photo_count: records.len(),
            resolved_count: records.len() - unresolved.len(),
            unresolved,
            index_state,
        };

        if let Some(newest) = records.iter().filter_map(|r| name_stamp(&r.storage_path)).max() {
            self.last_stamp.fetch_max(newest, Ordering::SeqCst);
        }
        self.replace(records);

        info!(
            "Loaded {} photos ({} unresolved)",
            summary.photo_count,
            summary.unresolved.len()
        );
        Ok(summary)
    }

    /// Generates a time-based storage name, strictly increasing per gallery
    fn next_storage_name(&self, extension: &str) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let stamp = match self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            }) {
            Ok(prev) | Err(prev) => now.max(prev + 1),
        };
        format!("{}.{}", stamp, extension)
    }

    fn prepend(&self, record: PhotoRecord) -> Arc<Vec<PhotoRecord>> {
        let mut guard = self.photos.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.push(record);
        next.extend(guard.iter().cloned());
        *guard = Arc::new(next);
        Arc::clone(&guard)
    }

    fn replace(&self, records: Vec<PhotoRecord>) {
        let mut guard = self.photos.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(records);
    }

    async fn write_index(&self, photos: &[PhotoRecord]) -> Result<(), GalleryError> {
        let index_failed = |message: String| {
            warn!(
                "Index write failed, stored gallery is stale until the next capture: {}",
                message
            );
            GalleryError::PartialPersist {
                stage: PersistStage::Index,
                message,
            }
        };

        let value = encode_index(photos).map_err(|e| index_failed(e.to_string()))?;
        self.index_store
            .set(&self.index_key, &value)
            .await
            .map_err(|e| index_failed(e.to_string()))?;
        debug!("Index {} updated ({} photos)", self.index_key, photos.len());
        Ok(())
    }
}

/// Millisecond stamp encoded in a generated storage name, if it is one
fn name_stamp(storage_path: &str) -> Option<i64> {
    let name = storage_path.rsplit('/').next()?;
    name.split('.').next()?.parse().ok()
}
