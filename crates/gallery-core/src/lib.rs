//! Gallery Core - Domain logic for the photo gallery
//!
//! This crate contains the photo gallery service, the persisted index format,
//! the environment strategies and the port definitions implemented by
//! `gallery-adapters`, following the Hexagonal Architecture pattern.

pub mod config;
pub mod directory;
pub mod encoding;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod photo;
pub mod ports;
pub mod strategy;

#[cfg(test)]
mod testing;

// Re-export primary types for convenient access
pub use config::{
    get_default_config_path, load_config, load_config_from_path, CaptureConfig, Config,
    Environment, EnvironmentConfig, StorageConfig,
};
pub use directory::DirectoryManager;
pub use error::{AppError, ConfigError};
pub use gallery::{GalleryError, IndexState, LoadSummary, PersistStage, PhotoGallery};
pub use logging::{init_logger, LogLevel, LoggerConfig, LoggerError, LoggerGuard};
pub use photo::{decode_index, encode_index, PhotoRecord};
pub use ports::{
    BlobError, BlobScope, BlobStorePort, CaptureError, CapturePort, CapturedPhoto, IndexError,
    IndexStorePort, PhotoSource,
};
pub use strategy::{BrowserStrategy, NativeStrategy, Strategy};
