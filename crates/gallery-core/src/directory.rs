//! Data directory layout
//!
//! Everything the gallery persists lives under one data directory:
//!
//! ```text
//! <data_dir>/
//!   config.toml
//!   gallery.db     index store
//!   photos/        blob store (`Data` scope)
//!   logs/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const PHOTOS_DIR: &str = "photos";
const LOGS_DIR: &str = "logs";
const DATABASE_FILE: &str = "gallery.db";
const CONFIG_FILE: &str = "config.toml";

/// Owner-only access
#[cfg(unix)]
const PRIVATE_DIR_MODE: u32 = 0o700;

/// Resolves and creates the paths inside the data directory
#[derive(Debug, Clone)]
pub struct DirectoryManager {
    data_dir: PathBuf,
}

impl DirectoryManager {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Uses `~/.gallery`, or `./.gallery` when there is no home directory
    pub fn with_default_dir() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(".gallery"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Backing directory of the `Data` blob scope
    pub fn photos_dir(&self) -> PathBuf {
        self.data_dir.join(PHOTOS_DIR)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join(LOGS_DIR)
    }

    /// SQLite file holding the index store
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    fn private_dirs(&self) -> [PathBuf; 3] {
        [self.data_dir.clone(), self.photos_dir(), self.logs_dir()]
    }

    /// Creates the data directory and its subdirectories
    ///
    /// Safe to call repeatedly. On Unix every directory is (re)set to mode
    /// 700, since photos are private to the user.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if a directory cannot be created
    pub fn initialize(&self) -> Result<(), ConfigError> {
        for dir in self.private_dirs() {
            ensure_private_dir(&dir)?;
        }
        tracing::info!("Data directory ready at {}", self.data_dir.display());
        Ok(())
    }

    /// True when every directory `initialize` creates is present
    pub fn is_initialized(&self) -> bool {
        self.private_dirs().iter().all(|dir| dir.is_dir())
    }
}

fn ensure_private_dir(path: &Path) -> Result<(), ConfigError> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
        tracing::debug!("Created directory {}", path.display());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(PRIVATE_DIR_MODE))?;
    }

    Ok(())
}
