//! CLI command implementations

pub mod capture;
pub mod config;
pub mod submit;
