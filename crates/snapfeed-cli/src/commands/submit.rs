//! Feedback submission command
//!
//! Runs the full pipeline: optional screenshot capture, report composition
//! from the command-line fields, card creation, and attachment uploads.

use crate::app::{self, InitOptions};
use anyhow::{bail, Context, Result};
use clap::Args;
use snapfeed_adapters::{CommandCaptureAdapter, TrelloAdapter};
use snapfeed_core::{
    missing_token_guidance, resolve_token, scratch_filename, DirectoryManager, FormFields,
    ScratchFile, ScreenshotCapture, SubmissionCoordinator,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::warn;

/// Feedback submission arguments
#[derive(Args, Debug, Default)]
pub struct SubmitArgs {
    /// One-line summary, also used as the card title
    #[arg(long, default_value = "")]
    pub summary: String,

    /// Reporter contact address
    #[arg(long, default_value = "")]
    pub email: String,

    /// Long-form description
    #[arg(long, default_value = "")]
    pub detail: String,

    /// Category index into the configured category list
    #[arg(long, default_value_t = 0)]
    pub category: usize,

    /// Priority index into the configured label list
    #[arg(long, default_value_t = 0)]
    pub priority: usize,

    /// Attach a file to the report (repeatable)
    #[arg(long = "attach", value_name = "PATH")]
    pub attach: Vec<PathBuf>,

    /// Skip the screenshot capture
    #[arg(long)]
    pub no_screenshot: bool,
}

impl SubmitArgs {
    fn form_fields(&self) -> FormFields {
        FormFields {
            summary: self.summary.clone(),
            email: self.email.clone(),
            detail: self.detail.clone(),
            category_index: self.category,
            priority_index: self.priority,
        }
    }
}

/// Execute the submission pipeline.
pub async fn run(args: SubmitArgs) -> Result<()> {
    let ctx = app::initialize(InitOptions::submission())?;
    let config = Arc::clone(&ctx.config);

    let token = resolve_token(&config.api.token).with_context(|| missing_token_guidance())?;

    let board = Arc::new(TrelloAdapter::new(config.api.base_url.clone(), token));
    let mut coordinator = SubmissionCoordinator::new(board, Arc::clone(&config));

    for path in &args.attach {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read attachment {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "attachment".to_string());
        coordinator.report_mut().add_attachment(name, data);
    }

    // Capture failures degrade to "no screenshot"; the scratch file is
    // removed when `_scratch` drops at the end of the submission.
    let include_screenshot = config.capture.include_screenshot && !args.no_screenshot;
    let _scratch = if include_screenshot {
        println!("Capturing screenshot...");
        let dir_manager = DirectoryManager::new(config.storage.data_dir.clone());
        let scratch = ScratchFile::new(dir_manager.scratch_dir().join(scratch_filename()));

        let capture = ScreenshotCapture::from_config(&config.capture);
        let cancel = Notify::new();
        match capture
            .capture(&CommandCaptureAdapter::new(), scratch.path(), &cancel)
            .await
        {
            Ok(Some(bytes)) => coordinator.report_mut().screenshot = Some(bytes),
            Ok(None) => warn!("Screenshot unreadable, submitting without it"),
            Err(e) => warn!(error = %e, "Screenshot capture failed, submitting without it"),
        }

        Some(scratch)
    } else {
        None
    };

    println!("Submitting feedback...");
    let outcome = coordinator.submit(&args.form_fields()).await?;

    if outcome.is_success() {
        match &outcome.card {
            Some(card) => println!("Feedback submitted (card {})", card.id),
            None => println!("Feedback submitted"),
        }
        Ok(())
    } else {
        for failure in &outcome.failed_attachments {
            eprintln!("  attachment '{}' failed: {}", failure.name, failure.error);
        }
        bail!(
            "Submission failed: {}",
            outcome
                .last_error
                .unwrap_or_else(|| "unknown error".to_string())
        )
    }
}
