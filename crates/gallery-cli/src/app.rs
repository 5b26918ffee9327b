//! Application initialization and lifecycle management
//!
//! Provides the initialization sequence shared by every subcommand and the
//! wiring of concrete adapters into a `PhotoGallery`.

use anyhow::{Context, Result};
use gallery_adapters::{FsBlobStore, SqliteIndexStore};
use gallery_core::ports::CapturePort;
use gallery_core::{
    init_logger, load_config, Config, DirectoryManager, Environment, LogLevel, LoggerConfig,
    LoggerGuard, PhotoGallery,
};
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Gallery wired to the on-disk adapters
pub type DiskGallery<C> = PhotoGallery<C, FsBlobStore, SqliteIndexStore>;

/// Application context holding initialized components
pub struct AppContext {
    /// Effective configuration (after command line overrides)
    pub config: Arc<Config>,
    /// Layout of the data directory
    pub directories: DirectoryManager,
    #[allow(dead_code)]
    logger_guard: Option<LoggerGuard>,
}

impl AppContext {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds a gallery around `capture` using the file-system blob store
    /// and the SQLite index store under the data directory
    pub async fn open_gallery<C: CapturePort>(&self, capture: C) -> Result<DiskGallery<C>> {
        let blobs = FsBlobStore::new(self.directories.photos_dir());
        let index = SqliteIndexStore::new(&self.directories.database_path())
            .await
            .context("Failed to open index database")?;

        Ok(PhotoGallery::new(
            Arc::new(capture),
            Arc::new(blobs),
            Arc::new(index),
            &self.config,
        ))
    }
}

/// Application initialization options
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Whether to initialize the logger
    pub init_logger: bool,
    /// Whether to create directory structure
    pub create_directories: bool,
    /// Log level override
    pub log_level: Option<LogLevel>,
    /// Mirror log output to stdout
    pub log_to_stdout: bool,
    /// Environment override from the command line
    pub mode: Option<Environment>,
}

impl InitOptions {
    /// Options used by the CLI subcommands
    pub fn command() -> Self {
        Self {
            init_logger: true,
            create_directories: true,
            log_level: None,
            log_to_stdout: false,
            mode: None,
        }
    }

    /// Enables stdout logging at debug level
    pub fn verbose(mut self, enabled: bool) -> Self {
        if enabled {
            self.log_to_stdout = true;
            self.log_level = Some(LogLevel::Debug);
        }
        self
    }

    pub fn with_mode(mut self, mode: Option<Environment>) -> Self {
        self.mode = mode;
        self
    }
}

/// Initializes the application from `~/.gallery/config.toml`
pub fn initialize(options: InitOptions) -> Result<AppContext> {
    let config = load_config().context("Failed to load configuration")?;
    initialize_with_config(config, options)
}

/// Initializes the application from an already loaded configuration
///
/// 1. Apply command line overrides
/// 2. Create the data directory structure (if requested)
/// 3. Initialize logging (if requested)
/// 4. Install the panic hook
pub fn initialize_with_config(mut config: Config, options: InitOptions) -> Result<AppContext> {
    if let Some(mode) = options.mode {
        config.environment.mode = mode;
    }
    let config = Arc::new(config);

    let directories = DirectoryManager::new(config.storage.data_dir.clone());
    if options.create_directories {
        directories
            .initialize()
            .context("Failed to create directory structure")?;
    }

    let logger_guard = if options.init_logger {
        let logger_config = LoggerConfig::new(directories.logs_dir())
            .with_level(options.log_level.unwrap_or_default())
            .with_stdout(options.log_to_stdout);

        Some(init_logger(logger_config).context("Failed to initialize logger")?)
    } else {
        None
    };

    setup_panic_hook(directories.logs_dir());
    info!(mode = %config.environment.mode, "Gallery initialized");

    Ok(AppContext {
        config,
        directories,
        logger_guard,
    })
}

fn setup_panic_hook(logs_dir: PathBuf) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        error!("FATAL ERROR at {}: {}", location, message);

        eprintln!();
        eprintln!("gallery encountered a fatal error and must exit.");
        eprintln!("Location: {}", location);
        eprintln!("Error: {}", message);
        eprintln!("Logs: {}", logs_dir.display());
        eprintln!();

        default_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_adapters::FileCaptureAdapter;
    use tempfile::TempDir;

    fn quiet_options() -> InitOptions {
        InitOptions {
            init_logger: false,
            ..InitOptions::command()
        }
    }

    fn temp_config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.data_dir = temp_dir.path().join("data");
        config
    }

    #[test]
    fn test_init_options_command() {
        let options = InitOptions::command();
        assert!(options.init_logger);
        assert!(options.create_directories);
        assert!(!options.log_to_stdout);
        assert!(options.log_level.is_none());
        assert!(options.mode.is_none());
    }

    #[test]
    fn test_verbose_enables_stdout_debug() {
        let options = InitOptions::command().verbose(true);
        assert!(options.log_to_stdout);
        assert_eq!(options.log_level, Some(LogLevel::Debug));

        let quiet = InitOptions::command().verbose(false);
        assert!(!quiet.log_to_stdout);
    }

    #[test]
    fn test_initialize_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = initialize_with_config(temp_config(&temp_dir), quiet_options()).unwrap();

        assert!(ctx.directories.is_initialized());
        assert!(ctx.directories.photos_dir().is_dir());
    }

    #[test]
    fn test_mode_override_applies() {
        let temp_dir = TempDir::new().unwrap();
        let options = quiet_options().with_mode(Some(Environment::Browser));

        let ctx = initialize_with_config(temp_config(&temp_dir), options).unwrap();
        assert_eq!(ctx.config().environment.mode, Environment::Browser);
    }

    #[test]
    fn test_no_override_keeps_configured_mode() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = initialize_with_config(temp_config(&temp_dir), quiet_options()).unwrap();
        assert_eq!(ctx.config().environment.mode, Environment::Native);
    }

    #[tokio::test]
    async fn test_open_gallery_uses_configured_mode() {
        let temp_dir = TempDir::new().unwrap();
        let options = quiet_options().with_mode(Some(Environment::Browser));
        let ctx = initialize_with_config(temp_config(&temp_dir), options).unwrap();

        let gallery = ctx
            .open_gallery(FileCaptureAdapter::from_bytes(b"x".to_vec(), "jpeg"))
            .await
            .unwrap();

        assert_eq!(gallery.environment(), Environment::Browser);
        assert!(ctx.directories.database_path().exists());
    }
}
