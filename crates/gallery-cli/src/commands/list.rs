//! List command
//!
//! Handles `gallery list`: loads the persisted gallery and prints it newest
//! first.

use super::abbreviate;
use crate::app::AppContext;
use anyhow::{Context, Result};
use gallery_adapters::FileCaptureAdapter;
use gallery_core::{IndexState, LoadSummary, PhotoRecord};

pub async fn run(ctx: &AppContext) -> Result<()> {
    // Listing never captures; the device is only needed to build the gallery
    let gallery = ctx
        .open_gallery(FileCaptureAdapter::from_bytes(Vec::new(), "jpeg"))
        .await?;
    let summary = gallery.load().await.context("Failed to load gallery")?;

    println!("{}", headline(&summary, &gallery.environment().to_string()));
    for line in render(&gallery.photos()) {
        println!("{}", line);
    }
    if summary.index_state == IndexState::Unreadable {
        println!();
        println!("Warning: the stored index could not be parsed and was ignored.");
    }

    Ok(())
}

fn headline(summary: &LoadSummary, mode: &str) -> String {
    match summary.photo_count {
        0 => format!("No photos ({} mode)", mode),
        1 => format!("1 photo ({} mode)", mode),
        n => format!(
            "{} photos ({} mode, {} displayable)",
            n, mode, summary.resolved_count
        ),
    }
}

fn render(photos: &[PhotoRecord]) -> Vec<String> {
    photos
        .iter()
        .enumerate()
        .map(|(i, photo)| {
            let display = match photo.display_reference.as_deref() {
                Some(reference) if photo.is_resolved() => abbreviate(reference),
                _ => "(unavailable)".to_string(),
            };
            format!("{:>4}. {}\n      {}", i + 1, photo.storage_path, display)
        })
        .collect()
}
