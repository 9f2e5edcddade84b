//! Hamper CLI

use std::process;

use clap::Parser;
use tracing::error;

use crate::cli::Cli;

mod cli;
mod config;
mod observability;

#[tokio::main]
pub async fn main() {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = cli.run().await {
        error!(%error, "command failed");
        eprintln!("{error}");
        process::exit(1);
    }
}
