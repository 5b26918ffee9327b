//! gallery - photo gallery with durable local storage
//!
//! Captures photos by importing image files, persists them through the
//! configured environment strategy and lists the gallery across restarts.

mod app;
mod commands;

use anyhow::Result;
use app::InitOptions;
use clap::{Parser, Subcommand};
use gallery_core::Environment;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gallery", version, about = "Photo gallery with durable local storage")]
struct Cli {
    /// Run with the browser storage strategy regardless of configuration
    #[arg(long, global = true)]
    browser: bool,

    /// Mirror debug logs to stdout
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a photo to the gallery
    Capture {
        /// Image file to import, or "-" to read from stdin
        #[arg(long, value_name = "FILE")]
        from: PathBuf,
    },
    /// Show the gallery, newest first
    List,
    /// Show mode, storage usage and configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = InitOptions::command()
        .verbose(cli.verbose)
        .with_mode(cli.browser.then_some(Environment::Browser));
    let ctx = app::initialize(options)?;

    match cli.command {
        Commands::Capture { from } => commands::capture::run(&ctx, &from).await,
        Commands::List => commands::list::run(&ctx).await,
        Commands::Status => commands::status::run(&ctx).await,
    }
}
