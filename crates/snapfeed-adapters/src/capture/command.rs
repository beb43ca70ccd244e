//! Platform screenshot command adapter
//!
//! Shells out to the OS screenshot tool (`screencapture` on macOS, `scrot`
//! on Linux) and lets the core pipeline wait for the written file.

use async_trait::async_trait;
use snapfeed_core::ports::capture::{CaptureError, CapturePort};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, error};

/// Adapter that triggers a capture via the platform screenshot command.
#[derive(Debug, Clone, Default)]
pub struct CommandCaptureAdapter;

impl CommandCaptureAdapter {
    /// Creates a new command capture adapter.
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "macos")]
    fn build_command(target: &Path) -> Command {
        let mut cmd = Command::new("screencapture");
        // -x suppresses the shutter sound
        cmd.arg("-x").arg(target);
        cmd
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn build_command(target: &Path) -> Command {
        let mut cmd = Command::new("scrot");
        cmd.arg(target);
        cmd
    }

    #[cfg(not(unix))]
    fn build_command(_target: &Path) -> Command {
        // Unsupported platform; the spawn error is mapped below
        Command::new("snapfeed-unsupported-capture")
    }
}

#[async_trait]
impl CapturePort for CommandCaptureAdapter {
    async fn trigger_capture(&self, target: &Path) -> Result<(), CaptureError> {
        debug!(path = %target.display(), "Triggering screen capture");

        let output = Self::build_command(target)
            .output()
            .await
            .map_err(|e| CaptureError::TriggerFailed(format!("failed to start: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(status = %output.status, stderr = %stderr, "Screenshot command failed");
            return Err(CaptureError::TriggerFailed(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_creation() {
        let _adapter = CommandCaptureAdapter::new();
        let _default = CommandCaptureAdapter::default();
    }

    #[tokio::test]
    async fn test_trigger_failure_is_reported() {
        // Point the command at a path the tool cannot write to; depending on
        // the environment the tool itself may be missing, which is also a
        // trigger failure.
        let adapter = CommandCaptureAdapter::new();
        let result = adapter
            .trigger_capture(Path::new("/nonexistent-dir/shot.png"))
            .await;

        if let Err(e) = result {
            assert!(matches!(e, CaptureError::TriggerFailed(_)));
        }
    }
}
