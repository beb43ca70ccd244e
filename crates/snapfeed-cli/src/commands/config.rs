//! Config inspection command
//!
//! Prints the resolved configuration. Token material is never shown, only
//! whether a token is configured and where it came from.

use crate::app::{self, InitOptions};
use anyhow::Result;
use snapfeed_core::{get_default_config_path, resolve_token, TOKEN_ENV};

/// Print the resolved configuration.
pub fn run() -> Result<()> {
    let ctx = app::initialize(InitOptions::command())?;
    let config = &ctx.config;

    println!("Config file: {}", get_default_config_path().display());
    println!("Data dir:    {}", config.storage.data_dir.display());
    println!();

    println!("[api]");
    println!("  base_url = {}", config.api.base_url);
    println!("  token    = {}", describe_token(&config.api.token));
    println!();

    println!("[capture]");
    println!("  include_screenshot = {}", config.capture.include_screenshot);
    println!("  file_wait_secs     = {}", config.capture.file_wait_secs);
    println!("  read_attempts      = {}", config.capture.read_attempts);
    println!("  read_retry_ms      = {}", config.capture.read_retry_ms);
    println!();

    println!("[board]");
    println!("  id         = {}", config.board.id);
    println!("  categories = {}", config.board.category_names.join(", "));
    println!(
        "  labels     = {}",
        config
            .board
            .labels
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(())
}

fn describe_token(config_token: &str) -> String {
    let env_set = std::env::var(TOKEN_ENV)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);

    if env_set {
        format!("set (from {})", TOKEN_ENV)
    } else if resolve_token(config_token).is_some() {
        "set (from config file)".to_string()
    } else {
        "not set".to_string()
    }
}
