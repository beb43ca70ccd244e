//! One-shot screenshot capture command
//!
//! Captures a screenshot into the scratch directory and leaves it there,
//! useful for verifying the capture backend works before submitting.

use crate::app::{self, InitOptions};
use anyhow::{Context, Result};
use snapfeed_adapters::CommandCaptureAdapter;
use snapfeed_core::{scratch_filename, DirectoryManager, ScreenshotCapture};
use tokio::sync::Notify;

/// Capture a screenshot and report where it landed.
pub async fn run() -> Result<()> {
    let ctx = app::initialize(InitOptions::command())?;

    let dir_manager = DirectoryManager::new(ctx.config.storage.data_dir.clone());
    let target = dir_manager.scratch_dir().join(scratch_filename());

    println!("Capturing screenshot...");
    let capture = ScreenshotCapture::from_config(&ctx.config.capture);
    let cancel = Notify::new();
    let bytes = capture
        .capture(&CommandCaptureAdapter::new(), &target, &cancel)
        .await
        .context("screenshot capture failed")?
        .context("screenshot file could not be read")?;

    println!(
        "Saved {} ({})",
        target.display(),
        format_file_size(bytes.len() as u64)
    );

    Ok(())
}

fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
