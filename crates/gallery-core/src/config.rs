//! Configuration management for the gallery
//!
//! Handles loading and validation of TOML configuration files.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Runtime environment settings
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Storage-related settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Capture-related settings
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Runtime environment the gallery is running in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Direct file-system access; photos are served from device-local paths
    #[default]
    #[serde(alias = "hybrid")]
    Native,
    /// No persistent local file access; photos are stored as base64 text and
    /// displayed through inline data references
    #[serde(alias = "web")]
    Browser,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Native => write!(f, "native"),
            Environment::Browser => write!(f, "browser"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" | "hybrid" => Ok(Environment::Native),
            "browser" | "web" => Ok(Environment::Browser),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

/// Environment configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    /// Which encoding strategy to use (default: native)
    #[serde(default)]
    pub mode: Environment,

    /// Base URL of the webview server that exposes device-local files
    #[serde(default = "default_webview_server_url")]
    pub webview_server_url: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            mode: Environment::default(),
            webview_server_url: default_webview_server_url(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base data directory (default: ~/.gallery/)
    #[serde(
        default = "default_data_dir",
        deserialize_with = "deserialize_data_dir"
    )]
    pub data_dir: PathBuf,

    /// Index store key holding the serialized gallery (default: "photos")
    #[serde(default = "default_index_key")]
    pub index_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_key: default_index_key(),
        }
    }
}

/// Capture configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Media type for inline data references when the stored name has no
    /// extension (default: image/jpeg)
    #[serde(default = "default_media_type")]
    pub media_type: String,

    /// Extension of generated storage names when the device reports no
    /// usable format (default: jpeg)
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            media_type: default_media_type(),
            file_extension: default_file_extension(),
        }
    }
}

fn default_webview_server_url() -> String {
    "http://localhost".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gallery")
}

fn default_index_key() -> String {
    "photos".to_string()
}

fn default_media_type() -> String {
    "image/jpeg".to_string()
}

fn default_file_extension() -> String {
    "jpeg".to_string()
}

/// Expands a leading tilde (~) in a path to the home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    path.to_path_buf()
}

/// Custom deserializer for data_dir that expands tilde
fn deserialize_data_dir<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let path_str = String::deserialize(deserializer)?;
    Ok(expand_tilde(&PathBuf::from(path_str)))
}

impl Config {
    /// Validates the configuration values
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if:
    /// - `environment.webview_server_url` is not an http(s) URL
    /// - `storage.index_key` is empty
    /// - `capture.media_type` is not an image type
    /// - `capture.file_extension` is empty or not alphanumeric
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.environment.webview_server_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "webview_server_url must start with http:// or https://".to_string(),
            ));
        }

        if self.storage.index_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "index_key must not be empty".to_string(),
            ));
        }

        if !self.capture.media_type.starts_with("image/") {
            return Err(ConfigError::InvalidValue(
                "media_type must be an image/* type".to_string(),
            ));
        }

        let ext = &self.capture.file_extension;
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidValue(
                "file_extension must be a non-empty alphanumeric string".to_string(),
            ));
        }

        Ok(())
    }
}

/// Returns the default configuration file path (`~/.gallery/config.toml`)
pub fn get_default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

/// Loads configuration from the specified path
///
/// If the file doesn't exist, creates a default configuration file.
/// If the file is invalid or contains invalid values, returns default configuration.
///
/// # Errors
/// Only IO errors during file creation or reading are returned
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = Config::default();
        let toml_str = toml::to_string_pretty(&default_config)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, &toml_str)?;

        tracing::info!("Created default configuration file at {:?}", path);
        return Ok(default_config);
    }

    let content = fs::read_to_string(path)?;

    let config: Config = match toml::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(
                "Failed to parse configuration file {:?}: {}. Using default configuration.",
                path,
                e
            );
            return Ok(Config::default());
        }
    };

    if let Err(e) = config.validate() {
        tracing::warn!(
            "Invalid configuration in {:?}: {}. Using default configuration.",
            path,
            e
        );
        return Ok(Config::default());
    }

    Ok(config)
}

/// Loads configuration from the default path (`~/.gallery/config.toml`)
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from_path(&get_default_config_path())
}
