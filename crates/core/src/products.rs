//! Products

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    discounts::{DiscountError, DiscountRate, discounted_price},
    prices::Price,
};

/// Storefront product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw product identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Live product pricing as served by the catalogue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductDetail {
    /// Product identifier
    pub id: ProductId,

    /// List price before the product discount
    pub price: Price,

    /// Current product discount rate
    pub discount_rate: DiscountRate,

    /// Units in stock, when the catalogue tracks stock for the product
    pub stock_quantity: Option<u32>,
}

impl ProductDetail {
    /// The price after the product's own discount rate.
    ///
    /// # Errors
    ///
    /// Returns a `DiscountError` if the discount amount cannot be represented.
    pub fn final_price(&self) -> Result<Price, DiscountError> {
        discounted_price(self.price, &self.discount_rate)
    }
}
