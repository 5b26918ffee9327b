//! In-memory port implementations shared by the unit tests

use crate::ports::blob::{BlobError, BlobScope, BlobStorePort};
use crate::ports::capture::{CaptureError, CapturePort, CapturedPhoto, PhotoSource};
use crate::ports::index::{IndexError, IndexStorePort};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Prefix of confirmed paths in the `Data` scope
pub const DATA_URI_ROOT: &str = "file:///data/";

pub struct MockCapturePort {
    queued: Mutex<VecDeque<CapturedPhoto>>,
    transient: Mutex<HashMap<String, Vec<u8>>>,
    pub cancel: AtomicBool,
    pub fail: AtomicBool,
    capture_count: AtomicUsize,
}

impl MockCapturePort {
    pub fn new() -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            transient: Mutex::new(HashMap::new()),
            cancel: AtomicBool::new(false),
            fail: AtomicBool::new(false),
            capture_count: AtomicUsize::new(0),
        }
    }

    pub fn queue(&self, photo: CapturedPhoto) {
        self.queued.lock().unwrap().push_back(photo);
    }

    /// Makes `data` resolvable through `reference`
    pub fn register_transient(&self, reference: &str, data: &[u8]) {
        self.transient
            .lock()
            .unwrap()
            .insert(reference.to_string(), data.to_vec());
    }

    /// Queues a capture whose bytes sit behind a transient reference
    pub fn queue_transient(&self, reference: &str, data: &[u8]) {
        self.register_transient(reference, data);
        self.queue(CapturedPhoto {
            source: Some(PhotoSource::Transient(reference.to_string())),
            device_path: None,
            format: "jpeg".to_string(),
        });
    }

    /// Queues a capture written by the device to `device_path`
    pub fn queue_device_file(&self, device_path: &str) {
        self.queue(CapturedPhoto {
            source: Some(PhotoSource::Transient(format!("blob:{}", device_path))),
            device_path: Some(device_path.to_string()),
            format: "jpeg".to_string(),
        });
    }

    pub fn capture_count(&self) -> usize {
        self.capture_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapturePort for MockCapturePort {
    async fn capture_photo(&self) -> Result<CapturedPhoto, CaptureError> {
        self.capture_count.fetch_add(1, Ordering::SeqCst);
        if self.cancel.load(Ordering::SeqCst) {
            return Err(CaptureError::Cancelled);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(CaptureError::DeviceFailed("Mock failure".to_string()));
        }
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CaptureError::DeviceFailed("No photo queued".to_string()))
    }

    async fn resolve(&self, reference: &str) -> Result<Vec<u8>, CaptureError> {
        self.transient
            .lock()
            .unwrap()
            .get(reference)
            .cloned()
            .ok_or_else(|| CaptureError::DeviceFailed(format!("Unknown reference {}", reference)))
    }
}

pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_writes: AtomicBool,
    read_count: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
            read_count: AtomicUsize::new(0),
        }
    }

    fn key(path: &str, scope: BlobScope) -> String {
        match scope {
            BlobScope::Data => {
                let name = path.strip_prefix(DATA_URI_ROOT).unwrap_or(path);
                format!("/data/{}", name)
            }
            BlobScope::Device => path.strip_prefix("file://").unwrap_or(path).to_string(),
        }
    }

    pub fn insert(&self, path: &str, scope: BlobScope, data: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(Self::key(path, scope), data.to_vec());
    }

    pub fn get(&self, path: &str, scope: BlobScope) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(&Self::key(path, scope)).cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStorePort for MemoryBlobStore {
    async fn write(&self, path: &str, data: &[u8], scope: BlobScope) -> Result<String, BlobError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BlobError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        let key = Self::key(path, scope);
        self.blobs.lock().unwrap().insert(key.clone(), data.to_vec());
        Ok(format!("file://{}", key))
    }

    async fn read(&self, path: &str, scope: BlobScope) -> Result<Vec<u8>, BlobError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.get(path, scope)
            .ok_or_else(|| BlobError::NotFound(path.to_string()))
    }
}

pub struct MemoryIndexStore {
    values: Mutex<HashMap<String, String>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    set_count: AtomicUsize,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            set_count: AtomicUsize::new(0),
        }
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn set_count(&self) -> usize {
        self.set_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndexStorePort for MemoryIndexStore {
    async fn get(&self, key: &str) -> Result<Option<String>, IndexError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(IndexError::DatabaseError("Mock read failure".to_string()));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), IndexError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(IndexError::DatabaseError("Mock write failure".to_string()));
        }
        self.set_count.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
