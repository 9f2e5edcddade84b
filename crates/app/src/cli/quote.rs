use std::{io, path::PathBuf};

use clap::Args;
use hamper_app::domain::carts::{CartSource, FileCartSource};
use jiff::Timestamp;
use tracing::info;

use crate::cli::Settings;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Read the cart from a JSON file instead of the storefront API
    #[arg(long)]
    cart_file: Option<PathBuf>,
}

pub(crate) async fn run(args: QuoteArgs, settings: &Settings) -> Result<(), String> {
    let context = settings.context()?;

    let cart = match args.cart_file {
        Some(path) => FileCartSource::new(path, settings.currency).current_cart().await,
        None => context.carts.current_cart().await,
    }
    .map_err(|error| format!("failed to load cart: {error}"))?;

    if cart.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    let preferences = settings.preferences.load().await;

    let quote = context
        .checkout()
        .quote(&cart, &preferences, Timestamp::now())
        .await
        .map_err(|error| format!("failed to price cart: {error}"))?;

    info!(total = %quote.total(), lines = quote.cart.len(), "cart quoted");

    quote
        .receipt()
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print receipt: {error}"))
}
