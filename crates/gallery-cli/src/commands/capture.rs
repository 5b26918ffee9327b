//! Capture command
//!
//! Handles `gallery capture --from <file>`: imports an image as a new photo.
//! `--from -` reads the image from stdin.

use super::{abbreviate, blob_file, format_file_size};
use crate::app::AppContext;
use anyhow::{Context, Result};
use gallery_adapters::FileCaptureAdapter;
use std::io::Read;
use std::path::Path;

pub async fn run(ctx: &AppContext, from: &Path) -> Result<()> {
    let adapter = if from == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .context("Failed to read image from stdin")?;
        FileCaptureAdapter::from_bytes(data, ctx.config().capture.file_extension.clone())
    } else {
        FileCaptureAdapter::from_path(from)
    };

    let gallery = ctx.open_gallery(adapter).await?;

    // The index is rewritten in full, so start from what is persisted
    gallery
        .load()
        .await
        .context("Failed to load existing gallery")?;

    let record = gallery.capture().await.context("Failed to capture photo")?;

    let size = blob_file(&ctx.directories.photos_dir(), &record.storage_path)
        .and_then(|path| std::fs::metadata(path).ok())
        .map(|metadata| format_file_size(metadata.len()))
        .unwrap_or_else(|| "unknown".to_string());

    println!("Photo saved ({} mode)", gallery.environment());
    println!("  Stored as: {}", record.storage_path);
    println!(
        "  Display:   {}",
        record
            .display_reference
            .as_deref()
            .map(abbreviate)
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  Size:      {}", size);
    println!("  Photos:    {}", gallery.photos().len());

    Ok(())
}
