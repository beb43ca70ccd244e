//! Screenshot capture pipeline
//!
//! Drives the OS-level capture through [`CapturePort`]: trigger the capture,
//! wait for the file to appear on disk, then read the bytes back with bounded
//! retries. Read failures degrade to "no screenshot" rather than failing the
//! submission.

use crate::config::CaptureConfig;
use crate::ports::capture::{CaptureError, CapturePort};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, error, warn};

/// Poll interval while waiting for the capture file to appear
const FILE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Returns a collision-free scratch file name for the next capture
/// (`debug-<ddMMyyyy-HHmmss>.png`).
pub fn scratch_filename() -> String {
    format!("debug-{}.png", chrono::Local::now().format("%d%m%Y-%H%M%S"))
}

/// A screenshot temp file that is deleted best-effort on drop.
///
/// Deletion ignores "file already gone"; the file may never have been
/// written if the capture failed.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Wraps the given path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file now, best-effort.
    pub fn remove(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove scratch file");
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Reads a screenshot produced by an external capture command.
#[derive(Debug, Clone)]
pub struct ScreenshotCapture {
    /// Maximum read attempts once the file exists
    attempts: u32,
    /// Delay between read attempts
    retry_delay: Duration,
    /// Upper bound on waiting for the file to appear
    file_wait: Duration,
}

impl ScreenshotCapture {
    /// Creates a capture pipeline with explicit bounds.
    pub fn new(attempts: u32, retry_delay: Duration, file_wait: Duration) -> Self {
        Self {
            attempts,
            retry_delay,
            file_wait,
        }
    }

    /// Creates a capture pipeline from the capture configuration.
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(
            config.read_attempts,
            Duration::from_millis(config.read_retry_ms),
            Duration::from_secs(config.file_wait_secs),
        )
    }

    /// Runs the full capture sequence: trigger, wait for the file, read.
    ///
    /// Returns `Ok(Some(bytes))` on success and `Ok(None)` when the file
    /// existed but could not be read within the allowed attempts; callers
    /// treat that as "proceed without screenshot". Trigger failures, the
    /// wait-for-file timeout, and cancellation surface as errors.
    pub async fn capture<C: CapturePort + ?Sized>(
        &self,
        port: &C,
        target: &Path,
        cancel: &Notify,
    ) -> Result<Option<Vec<u8>>, CaptureError> {
        port.trigger_capture(target).await?;
        self.wait_for_file(target, cancel).await?;
        Ok(self.read_with_retry(target, |p| std::fs::read(p)).await)
    }

    /// Waits for the capture file to appear, racing cancellation and the
    /// configured timeout.
    ///
    /// Cancellation deletes the partial file before returning.
    async fn wait_for_file(&self, target: &Path, cancel: &Notify) -> Result<(), CaptureError> {
        let poll = async {
            while !target.exists() {
                tokio::time::sleep(FILE_POLL_INTERVAL).await;
            }
        };

        tokio::select! {
            _ = cancel.notified() => {
                debug!(path = %target.display(), "Capture wait cancelled");
                let _ = std::fs::remove_file(target);
                Err(CaptureError::Cancelled)
            }
            result = tokio::time::timeout(self.file_wait, poll) => {
                result.map_err(|_| CaptureError::Timeout(self.file_wait))
            }
        }
    }

    /// Reads the capture file with bounded retries.
    ///
    /// Transient I/O errors (contention while the OS tool still holds the
    /// file) are logged and retried; any other error aborts the loop
    /// immediately. Returns `None` when no attempt succeeded.
    pub async fn read_with_retry<F>(&self, target: &Path, mut read: F) -> Option<Vec<u8>>
    where
        F: FnMut(&Path) -> io::Result<Vec<u8>>,
    {
        for attempt in 1..=self.attempts {
            match read(target) {
                Ok(bytes) => {
                    debug!(attempt, size = bytes.len(), "Screenshot read succeeded");
                    return Some(bytes);
                }
                Err(e) if is_transient(e.kind()) => {
                    error!(attempt, error = %e, "I/O contention on screenshot read");
                }
                Err(e) => {
                    error!(attempt, error = %e, "Unexpected error on screenshot read, giving up");
                    return None;
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        warn!(
            attempts = self.attempts,
            path = %target.display(),
            "Failed to read screenshot, submitting without it"
        );
        None
    }
}

/// Error kinds that indicate the file is merely still being written.
fn is_transient(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::PermissionDenied
    )
}
