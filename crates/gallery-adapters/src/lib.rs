//! Gallery Adapters - Infrastructure implementations
//!
//! Concrete implementations of the ports defined in gallery-core: a
//! file-system blob store, a SQLite-backed index store and a capture device
//! that imports existing image files.

pub mod blob;
pub mod capture;
pub mod storage;

// Re-export primary adapter types
pub use blob::FsBlobStore;
pub use capture::FileCaptureAdapter;
pub use storage::SqliteIndexStore;
