//! Capture port definition

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while producing a screenshot
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The platform screenshot command could not be started or failed
    #[error("capture command failed: {0}")]
    TriggerFailed(String),

    /// The capture file never appeared within the configured wait
    #[error("timed out after {0:?} waiting for the capture file to appear")]
    Timeout(Duration),

    /// The pending capture was cancelled (form closed or hidden)
    #[error("capture cancelled")]
    Cancelled,

    /// IO error during capture
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for triggering an OS-level screen capture.
///
/// Implementations start a platform screenshot that writes a PNG to
/// `target`. The file may appear on disk *after* this call returns; waiting
/// for it is the caller's job.
#[async_trait]
pub trait CapturePort: Send + Sync {
    /// Triggers a screen capture writing to the given path.
    async fn trigger_capture(&self, target: &Path) -> Result<(), CaptureError>;
}
