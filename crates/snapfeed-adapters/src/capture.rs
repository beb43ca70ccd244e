//! Screen capture adapter implementations

mod command;

pub use command::CommandCaptureAdapter;
