//! snapfeed adapters - Infrastructure implementations
//!
//! This crate contains concrete implementations of the ports defined in
//! snapfeed-core: the Trello REST client and the OS screenshot command
//! adapter.

pub mod board;
pub mod capture;

// Re-export primary adapter types
pub use board::TrelloAdapter;
pub use capture::CommandCaptureAdapter;
