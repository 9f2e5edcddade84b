//! Checkout service.

use std::sync::Arc;

use hamper::{
    cart::CartSnapshot,
    coupons::{AppliedCoupon, CouponRejection},
    enrichment::{PricedCart, enrich},
    prices::{Price, zero},
    receipt::Receipt,
};
use jiff::Timestamp;
use rusty_money::iso::Currency;
use tracing::info;

use crate::domain::{
    catalog::ProductCatalog,
    checkout::errors::CheckoutError,
    coupons::{CouponDirectory, redeem},
    preferences::{CheckoutPreferences, ShippingMethod},
    pricing::MetaCache,
};

/// A priced cart with the outcome of the shopper's voucher.
#[derive(Debug, Clone)]
pub struct CheckoutQuote {
    pub cart: PricedCart,
    pub coupon: Option<Result<AppliedCoupon, CouponRejection>>,
    pub shipping_method: ShippingMethod,
}

impl CheckoutQuote {
    /// Cart total before any coupon.
    pub fn subtotal(&self) -> Price {
        self.cart.total()
    }

    /// Amount taken off by an applied coupon.
    pub fn discount(&self) -> Price {
        match &self.coupon {
            Some(Ok(applied)) => applied.discount,
            Some(Err(_)) | None => zero(self.cart.currency()),
        }
    }

    /// Amount payable.
    pub fn total(&self) -> Price {
        match &self.coupon {
            Some(Ok(applied)) => applied.total,
            Some(Err(_)) | None => self.cart.total(),
        }
    }

    /// Printable receipt for the quote.
    pub fn receipt(&self) -> Receipt<'_> {
        let receipt =
            Receipt::new(&self.cart).with_note("Shipping", self.shipping_method.to_string());

        match &self.coupon {
            Some(outcome) => receipt.with_coupon(outcome),
            None => receipt,
        }
    }
}

/// Prices carts at checkout and applies the shopper's voucher.
///
/// Keeps one meta cache for its lifetime, so repeated quotes only fetch products not seen yet.
pub struct CheckoutService {
    catalog: Arc<dyn ProductCatalog>,
    coupons: Arc<dyn CouponDirectory>,
    cache: MetaCache,
    currency: &'static Currency,
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        coupons: Arc<dyn CouponDirectory>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            catalog,
            coupons,
            cache: MetaCache::new(),
            currency,
        }
    }

    pub fn cache(&self) -> &MetaCache {
        &self.cache
    }

    /// Price `cart` with live product data and evaluate the stored voucher at `now`.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if the cart cannot be priced. Coupon problems are reported in
    /// the quote instead.
    #[tracing::instrument(
        name = "checkout.service.quote",
        skip(self, cart, preferences),
        fields(line_count = cart.len()),
        err
    )]
    pub async fn quote(
        &mut self,
        cart: &CartSnapshot,
        preferences: &CheckoutPreferences,
        now: Timestamp,
    ) -> Result<CheckoutQuote, CheckoutError> {
        let report = self.cache.sync(self.catalog.as_ref(), cart.items()).await;

        if report.failed > 0 {
            info!(failed = report.failed, "some lines priced from the cart snapshot");
        }

        let priced = enrich(cart.items(), self.cache.table(), self.currency)?;

        let coupon = match preferences.voucher_code.as_deref() {
            Some(code) => Some(redeem(self.coupons.as_ref(), code, priced.total(), now).await),
            None => None,
        };

        Ok(CheckoutQuote {
            cart: priced,
            coupon,
            shipping_method: preferences.shipping_method,
        })
    }
}
