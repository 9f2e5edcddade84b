use clap::{Args, Subcommand};
use hamper_app::domain::preferences::ShippingMethod;

use crate::cli::Settings;

#[derive(Debug, Args)]
pub(crate) struct PrefsCommand {
    #[command(subcommand)]
    command: PrefsSubcommand,
}

#[derive(Debug, Subcommand)]
enum PrefsSubcommand {
    /// Print the stored preferences
    Show,
    /// Change the stored preferences
    Set(SetPrefsArgs),
}

#[derive(Debug, Args)]
struct SetPrefsArgs {
    /// Shipping method
    #[arg(long, value_enum)]
    shipping: Option<ShippingMethod>,

    /// Voucher code to apply at checkout
    #[arg(long, conflicts_with = "clear_voucher")]
    voucher: Option<String>,

    /// Forget the stored voucher code
    #[arg(long)]
    clear_voucher: bool,
}

pub(crate) async fn run(command: PrefsCommand, settings: &Settings) -> Result<(), String> {
    let store = &settings.preferences;
    let mut preferences = store.load().await;

    if let PrefsSubcommand::Set(args) = command.command {
        if let Some(shipping) = args.shipping {
            preferences.shipping_method = shipping;
        }

        if args.clear_voucher {
            preferences.set_voucher(None);
        } else if let Some(voucher) = args.voucher.as_deref() {
            preferences.set_voucher(Some(voucher));
        }

        store
            .save(&preferences)
            .await
            .map_err(|error| format!("failed to save preferences: {error}"))?;
    }

    println!("preferences: {}", store.path().display());
    println!("shipping_method: {}", preferences.shipping_method);
    println!(
        "voucher_code: {}",
        preferences.voucher_code.as_deref().unwrap_or("none")
    );

    Ok(())
}
