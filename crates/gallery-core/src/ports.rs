//! Port definitions for Hexagonal Architecture
//!
//! These traits define the boundaries between the gallery service and the
//! capture device, blob store and index store adapters.

pub mod blob;
pub mod capture;
pub mod index;

pub use blob::{BlobError, BlobScope, BlobStorePort};
pub use capture::{CaptureError, CapturePort, CapturedPhoto, PhotoSource};
pub use index::{IndexError, IndexStorePort};
