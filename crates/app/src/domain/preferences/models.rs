//! Preferences models.

use std::fmt;

use clap::ValueEnum;
use hamper::coupons::normalize_code;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Fast,
    Express,
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => f.write_str("fast"),
            Self::Express => f.write_str("express"),
        }
    }
}

/// Checkout choices remembered between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutPreferences {
    pub shipping_method: ShippingMethod,
    pub voucher_code: Option<String>,
}

impl CheckoutPreferences {
    /// Parse stored preferences, falling back to defaults when the JSON is malformed.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Self>(json) {
            Ok(preferences) => preferences.normalized(),
            Err(error) => {
                warn!(%error, "malformed checkout preferences; using defaults");

                Self::default()
            }
        }
    }

    /// Set or clear the voucher code. Blank codes clear it.
    pub fn set_voucher(&mut self, code: Option<&str>) {
        self.voucher_code = code.and_then(normalize_code);
    }

    #[must_use]
    fn normalized(mut self) -> Self {
        self.voucher_code = self.voucher_code.as_deref().and_then(normalize_code);
        self
    }
}
