//! Cart

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    prices::{Price, checked_times, zero},
    products::ProductId,
};

/// Errors related to cart snapshot construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// An item's currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),
}

/// One product and quantity entry of a server-side cart.
///
/// `price` and `subtotal` are the server's snapshot and may be stale.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    /// Product in the line
    pub product_id: ProductId,

    /// Product display name
    pub product_name: String,

    /// Product image, if any
    pub product_image_url: Option<String>,

    /// Unit price known to the server when the cart was read
    pub price: Price,

    /// Quantity reported by the server
    pub quantity: i64,

    /// Line subtotal reported by the server
    pub subtotal: Price,
}

impl CartLineItem {
    /// Create a line item, deriving the snapshot subtotal from price and quantity.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        price: Price,
        quantity: i64,
    ) -> Self {
        let subtotal = checked_times(price, quantity.max(0)).unwrap_or_else(|| {
            Price::from_minor(i64::MAX, price.currency())
        });

        Self {
            product_id,
            product_name: product_name.into(),
            product_image_url: None,
            price,
            quantity,
            subtotal,
        }
    }

    /// Attach a product image URL.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.product_image_url = Some(url.into());
        self
    }

    /// Quantity used for pricing: never less than one.
    pub fn billed_quantity(&self) -> i64 {
        self.quantity.max(1)
    }
}

/// The current server-side cart, with every line in one currency.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    items: Vec<CartLineItem>,
    currency: &'static Currency,
}

impl CartSnapshot {
    /// An empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a cart snapshot from line items.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if any line is priced in another currency.
    pub fn with_items(
        items: impl Into<Vec<CartLineItem>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            let item_currency = item.price.currency();

            if item_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    i,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Self { items, currency })
    }

    /// Line items in server order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consume the snapshot, returning its line items.
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// The cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the server's snapshot subtotals, saturating on overflow.
    pub fn snapshot_total(&self) -> Price {
        let minor = self
            .items
            .iter()
            .fold(0_i64, |acc, item| acc.saturating_add(item.subtotal.to_minor_units()));

        if self.items.is_empty() {
            zero(self.currency)
        } else {
            Price::from_minor(minor, self.currency)
        }
    }
}
