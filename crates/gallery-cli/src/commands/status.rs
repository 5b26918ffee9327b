//! Status command
//!
//! Handles `gallery status`: shows the active mode, the data directory and
//! what is persisted, without reading any photo data.

use super::format_file_size;
use crate::app::AppContext;
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use gallery_adapters::SqliteIndexStore;
use gallery_core::ports::IndexStorePort;
use gallery_core::{decode_index, get_default_config_path};
use std::path::Path;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let config = ctx.config();

    println!("Gallery Status");
    println!("==============");
    println!();
    println!("Mode: {}", config.environment.mode);
    println!();

    let db_path = ctx.directories.database_path();
    if db_path.exists() {
        let index = SqliteIndexStore::new(&db_path)
            .await
            .context("Failed to open index database")?;
        show_index(&index, &config.storage.index_key).await?;
    } else {
        println!("Index: Not initialized");
        println!("  Run 'gallery capture --from <file>' to add the first photo.");
    }

    let photos_dir = ctx.directories.photos_dir();
    let (files, bytes) = directory_usage(&photos_dir).unwrap_or((0, 0));
    println!();
    println!("Blobs");
    println!("-----");
    println!("  Files: {}", files);
    println!("  Storage used: {}", format_file_size(bytes));

    println!();
    println!("Configuration");
    println!("-------------");
    println!("  Config file: {}", get_default_config_path().display());
    println!("  Data directory: {}", config.storage.data_dir.display());
    println!("  Index key: {}", config.storage.index_key);
    println!("  Webview server: {}", config.environment.webview_server_url);
    println!(
        "  Capture format: {} (.{})",
        config.capture.media_type, config.capture.file_extension
    );

    Ok(())
}

/// What the stored index holds, judged without reading any photo data
#[derive(Debug, PartialEq, Eq)]
enum StoredIndex {
    /// No value, or a blank one
    Absent,
    Unreadable,
    Records { total: usize, with_reference: usize },
}

fn inspect_index(raw: Option<&str>) -> StoredIndex {
    let value = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return StoredIndex::Absent,
    };
    match decode_index(value) {
        Some(records) => StoredIndex::Records {
            total: records.len(),
            with_reference: records.iter().filter(|r| r.is_resolved()).count(),
        },
        None => StoredIndex::Unreadable,
    }
}

async fn show_index(index: &SqliteIndexStore, key: &str) -> Result<()> {
    let raw = index.get(key).await.context("Failed to read index")?;

    println!("Index");
    println!("-----");
    match inspect_index(raw.as_deref()) {
        StoredIndex::Absent => println!("  Photos: 0 (no index stored)"),
        StoredIndex::Unreadable => println!("  Photos: unknown (index is not valid JSON)"),
        StoredIndex::Records {
            total,
            with_reference,
        } => {
            println!("  Photos: {}", total);
            println!("  With stored display reference: {}", with_reference);
        }
    }

    if let Some(updated) = index.last_updated(key).await? {
        println!("  Last written: {}", format_timestamp(updated));
    }

    Ok(())
}

/// Count and total size of the files directly inside `dir`
fn directory_usage(dir: &Path) -> std::io::Result<(usize, u64)> {
    let mut files = 0;
    let mut total = 0;

    if dir.is_dir() {
        for entry in std::fs::read_dir(dir)? {
            let metadata = entry?.metadata()?;
            if metadata.is_file() {
                files += 1;
                total += metadata.len();
            }
        }
    }

    Ok((files, total))
}

fn format_timestamp(timestamp: i64) -> String {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
