//! snapfeed core - Domain logic for the snapfeed feedback pipeline
//!
//! This crate contains the report data model, the screenshot capture
//! sequence, the submission coordinator, and the port definitions following
//! the Hexagonal Architecture pattern.

pub mod config;
pub mod coordinator;
pub mod directory;
pub mod error;
pub mod logging;
pub mod ports;
pub mod report;
pub mod screenshot;
pub mod token;

// Re-export primary types for convenient access
pub use config::{
    get_default_config_path, load_config, load_config_from_path, ApiConfig, BoardConfig,
    CaptureConfig, Config, StorageConfig,
};
pub use coordinator::{
    AttachmentFailure, SubmissionCoordinator, SubmissionObserver, SubmissionOutcome,
    SubmissionPhase, SubmitError,
};
pub use directory::DirectoryManager;
pub use error::{BoardError, CaptureError, ConfigError, LoggerError, SnapfeedError};
pub use logging::{init_logger, LogLevel, LoggerConfig, LoggerGuard};
pub use ports::board::{CardRef, CreateCard, NO_DETAIL_PLACEHOLDER, NO_SUMMARY_PLACEHOLDER};
pub use ports::form::FormFields;
pub use ports::{BoardPort, CapturePort, FormPort};
pub use report::{Attachment, Label, ListRef, Report, Section};
pub use screenshot::{scratch_filename, ScratchFile, ScreenshotCapture};
pub use token::{missing_token_guidance, resolve_token, SecretToken, TOKEN_ENV};
