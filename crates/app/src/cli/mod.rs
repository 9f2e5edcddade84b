use clap::{Parser, Subcommand};
use hamper_app::{api::ApiConfig, context::AppContext, domain::preferences::PreferencesStore};
use rusty_money::iso::Currency;

use crate::config::{ApiSettings, PreferencesSettings, observability::LoggingConfig};

mod campaign;
mod coupon;
mod prefs;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "hamper", about = "Storefront cart pricing and checkout", long_about = None)]
pub(crate) struct Cli {
    /// Storefront API settings.
    #[command(flatten)]
    pub api: ApiSettings,

    /// Checkout preferences settings.
    #[command(flatten)]
    pub preferences: PreferencesSettings,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price the cart and print a checkout receipt
    Quote(quote::QuoteArgs),
    /// Check a coupon code against an order total
    Coupon(coupon::CouponArgs),
    /// Show or change checkout preferences
    Prefs(prefs::PrefsCommand),
    /// Show a group-buy campaign's progress
    Campaign(campaign::CampaignArgs),
}

/// What commands need from the configuration.
pub(crate) struct Settings {
    pub api: ApiConfig,
    pub currency: &'static Currency,
    pub preferences: PreferencesStore,
}

impl Settings {
    pub(crate) fn context(&self) -> Result<AppContext, String> {
        AppContext::from_api_config(&self.api, self.currency)
            .map_err(|error| format!("failed to initialise services: {error}"))
    }
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let currency = self.api.currency().map_err(|error| error.to_string())?;

        let settings = Settings {
            api: self.api.api_config(),
            currency,
            preferences: PreferencesStore::new(&self.preferences.preferences_path),
        };

        match self.command {
            Commands::Quote(args) => quote::run(args, &settings).await,
            Commands::Coupon(args) => coupon::run(args, &settings).await,
            Commands::Prefs(command) => prefs::run(command, &settings).await,
            Commands::Campaign(args) => campaign::run(args, &settings).await,
        }
    }
}
