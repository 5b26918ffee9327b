//! CLI command implementations
//!
//! Each subcommand has its own module with the implementation logic.

pub mod capture;
pub mod list;
pub mod status;

use std::path::{Path, PathBuf};

/// Longest display reference printed before it is abbreviated
const MAX_REFERENCE_WIDTH: usize = 72;

/// Format a byte count in human-readable form
pub(crate) fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Shortens long display references (inline data references can be megabytes)
pub(crate) fn abbreviate(reference: &str) -> String {
    if reference.chars().count() <= MAX_REFERENCE_WIDTH {
        return reference.to_string();
    }
    let head: String = reference.chars().take(MAX_REFERENCE_WIDTH).collect();
    format!("{}... ({} chars)", head, reference.len())
}

/// File backing a storage path, whether it is a bare name or a `file://` URI
pub(crate) fn blob_file(photos_dir: &Path, storage_path: &str) -> Option<PathBuf> {
    let raw = storage_path.strip_prefix("file://").unwrap_or(storage_path);
    Path::new(raw)
        .file_name()
        .map(|name| photos_dir.join(name))
}
