//! File-system blob store
//!
//! `Data` scope paths are file names relative to the photo directory.
//! `Device` scope paths are absolute paths or `file://` URIs anywhere on disk.
//! Confirmed paths are returned as `file://` URIs.

use async_trait::async_trait;
use gallery_core::ports::blob::{BlobError, BlobScope, BlobStorePort};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

const FILE_SCHEME: &str = "file://";

/// Blob store backed by a directory on the local file system
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    data_dir: PathBuf,
}

impl FsBlobStore {
    /// Creates a blob store rooted at `data_dir`
    ///
    /// A relative directory is resolved against the current working
    /// directory so that confirmed paths are always absolute.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let data_dir = if data_dir.is_absolute() {
            data_dir
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&data_dir))
                .unwrap_or(data_dir)
        };
        Self { data_dir }
    }

    /// Returns the directory backing the `Data` scope
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Maps a blob path in `scope` to a file on disk
    fn locate(&self, path: &str, scope: BlobScope) -> Result<PathBuf, BlobError> {
        let raw = path.strip_prefix(FILE_SCHEME).unwrap_or(path);
        let candidate = Path::new(raw);
        let invalid = || BlobError::InvalidPath(path.to_string());

        match scope {
            BlobScope::Data if candidate.is_absolute() => {
                // Confirmed paths handed out by `write` come back in this form
                if candidate.starts_with(&self.data_dir) && !has_parent_refs(candidate) {
                    Ok(candidate.to_path_buf())
                } else {
                    Err(invalid())
                }
            }
            BlobScope::Data => {
                let plain = candidate
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
                if raw.is_empty() || !plain {
                    return Err(invalid());
                }
                Ok(self.data_dir.join(candidate))
            }
            BlobScope::Device if candidate.is_absolute() => Ok(candidate.to_path_buf()),
            BlobScope::Device => Err(invalid()),
        }
    }
}

fn has_parent_refs(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

fn file_uri(path: &Path) -> String {
    format!("{}{}", FILE_SCHEME, path.display())
}

#[async_trait]
impl BlobStorePort for FsBlobStore {
    async fn write(&self, path: &str, data: &[u8], scope: BlobScope) -> Result<String, BlobError> {
        let target = self.locate(path, scope)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, data).await?;
        tracing::debug!("Wrote {} bytes to {:?}", data.len(), target);
        Ok(file_uri(&target))
    }

    async fn read(&self, path: &str, scope: BlobScope) -> Result<Vec<u8>, BlobError> {
        let target = self.locate(path, scope)?;
        fs::read(&target).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => BlobError::NotFound(path.to_string()),
            _ => BlobError::IoError(e),
        })
    }
}
