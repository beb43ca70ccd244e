//! Port definitions for Hexagonal Architecture
//!
//! These traits define the boundaries between the core domain and external
//! collaborators: the remote board API, the OS screenshot capability, and
//! the UI form that supplies field values.

pub mod board;
pub mod capture;
pub mod form;

pub use board::BoardPort;
pub use capture::CapturePort;
pub use form::FormPort;
