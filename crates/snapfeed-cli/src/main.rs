//! snapfeed CLI - in-app feedback submission pipeline
//!
//! Main entry point for the snapfeed application.

mod app;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::submit::SubmitArgs;

#[derive(Parser, Debug)]
#[command(
    name = "snapfeed",
    version,
    about = "Capture a screenshot and submit feedback to your board"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose and submit a feedback report
    Submit(SubmitArgs),
    /// Take a screenshot into the scratch directory
    Capture,
    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Submit(args) => commands::submit::run(args).await,
        Command::Capture => commands::capture::run().await,
        Command::Config => commands::config::run(),
    }
}
