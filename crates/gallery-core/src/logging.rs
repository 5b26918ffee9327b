//! Logging setup
//!
//! Structured logging through `tracing`, written to a daily rolling file under the
//! data directory and optionally mirrored to stdout. `RUST_LOG` overrides the
//! configured level.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Log file name prefix inside the log directory
pub const DEFAULT_LOG_FILE: &str = "gallery.log";

/// Target prefix shared by every crate in the workspace
const TARGET_PREFIX: &str = "gallery";

/// Errors that can occur during logger initialization
#[derive(Debug, Error)]
pub enum LoggerError {
    /// Failed to create log directory
    #[error("Failed to create log directory: {0}")]
    DirectoryCreationFailed(String),

    /// Failed to initialize the logger
    #[error("Failed to initialize logger: {0}")]
    InitializationFailed(String),

    /// Logger already initialized
    #[error("Logger has already been initialized")]
    AlreadyInitialized,
}

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Configuration for the gallery logger
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Level applied to the gallery crates
    pub level: LogLevel,
    /// Whether to also log to stdout
    pub log_to_stdout: bool,
}

impl LoggerConfig {
    /// Creates a new LoggerConfig writing into `log_dir`
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            log_dir,
            level: LogLevel::Info,
            log_to_stdout: false,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_stdout(mut self, enabled: bool) -> Self {
        self.log_to_stdout = enabled;
        self
    }

    /// Returns the log directory path
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub fn filter_directive(&self) -> String {
        format!("{}={}", TARGET_PREFIX, self.level)
    }
}

/// Keeps the non-blocking file writer alive; flushes on drop
pub struct LoggerGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Initializes the global subscriber
///
/// The returned guard must be held for the lifetime of the program.
///
/// # Errors
/// Returns `LoggerError::AlreadyInitialized` if a global subscriber is
/// already installed
pub fn init_logger(config: LoggerConfig) -> Result<LoggerGuard, LoggerError> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    std::fs::create_dir_all(&config.log_dir).map_err(|e| {
        LoggerError::DirectoryCreationFailed(format!("{}: {}", config.log_dir.display(), e))
    })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(DEFAULT_LOG_FILE)
        .build(&config.log_dir)
        .map_err(|e| LoggerError::InitializationFailed(e.to_string()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let stdout_layer = config.log_to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    tracing::info!(
        log_dir = %config.log_dir.display(),
        level = %config.level,
        "Gallery logger initialized"
    );

    Ok(LoggerGuard { _guard: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_round_trip_names() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    }

    #[test]
    fn test_log_level_from_str_invalid() {
        let result = "loud".parse::<LogLevel>();
        assert!(result.unwrap_err().contains("Unknown log level"));
    }

    #[test]
    fn test_logger_config_defaults() {
        let config = LoggerConfig::new(PathBuf::from("/tmp/gallery-logs"));
        assert_eq!(config.log_dir(), Path::new("/tmp/gallery-logs"));
        assert_eq!(config.level, LogLevel::Info);
        assert!(!config.log_to_stdout);
    }

    #[test]
    fn test_logger_config_builder_pattern() {
        let config = LoggerConfig::new(PathBuf::from("/tmp/logs"))
            .with_level(LogLevel::Debug)
            .with_stdout(true);

        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.log_to_stdout);
    }

    #[test]
    fn test_filter_directive_covers_workspace_crates() {
        let config = LoggerConfig::new(PathBuf::from("/tmp/logs")).with_level(LogLevel::Trace);
        assert_eq!(config.filter_directive(), "gallery=trace");
    }

    #[test]
    fn test_logger_error_display() {
        let err = LoggerError::DirectoryCreationFailed("/tmp/test".to_string());
        assert!(err.to_string().contains("/tmp/test"));
        assert!(LoggerError::AlreadyInitialized.to_string().contains("already"));
    }
}
