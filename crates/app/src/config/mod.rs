//! Hamper CLI configuration

use std::time::Duration;

use clap::Args;
use hamper_app::api::ApiConfig;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

pub(crate) mod observability;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The currency code is not a known ISO 4217 code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Storefront API settings.
#[derive(Debug, Args)]
pub(crate) struct ApiSettings {
    /// Storefront API base address
    #[arg(long, env = "HAMPER_API_URL", default_value = "http://localhost:3000/api")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "HAMPER_API_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub api_timeout_seconds: u64,

    /// ISO 4217 code of the shop currency
    #[arg(long, env = "HAMPER_CURRENCY", default_value = "VND")]
    pub currency: String,
}

impl ApiSettings {
    pub(crate) fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.api_timeout_seconds),
        }
    }

    /// Look the configured currency up.
    pub(crate) fn currency(&self) -> Result<&'static Currency, ConfigError> {
        let code = self.currency.trim().to_uppercase();

        iso::find(&code).ok_or(ConfigError::UnknownCurrency(code))
    }
}

/// Checkout preferences settings.
#[derive(Debug, Args)]
pub(crate) struct PreferencesSettings {
    /// Where checkout preferences are stored
    #[arg(long, env = "HAMPER_PREFERENCES_PATH", default_value = ".hamper/checkout.json")]
    pub preferences_path: String,
}
