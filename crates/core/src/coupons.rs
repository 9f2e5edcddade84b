//! Coupons

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use thiserror::Error;

use crate::{
    discounts::percent_of_minor,
    prices::{Price, min_price, non_negative},
};

/// Why a coupon cannot be applied. Displayed to the shopper as is.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CouponRejection {
    /// No code was entered.
    #[error("please enter a coupon code")]
    EmptyCode,

    /// The code does not exist.
    #[error("coupon not found")]
    NotFound,

    /// The coupon service could not be reached.
    #[error("coupon could not be verified, please try again")]
    Unavailable,

    /// The validity window has not opened.
    #[error("coupon is not valid until {0}")]
    NotYetValid(Timestamp),

    /// The validity window has closed.
    #[error("coupon expired at {0}")]
    Expired(Timestamp),

    /// Every allowed use has been taken.
    #[error("coupon has reached its usage limit")]
    UsageExhausted,

    /// The order is below the coupon's minimum spend.
    #[error("order total must be at least {0} to use this coupon")]
    BelowMinimum(Price),

    /// The coupon is priced in a different currency from the order.
    #[error("coupon cannot be used with {0} orders")]
    CurrencyMismatch(&'static str),

    /// The discount could not be calculated.
    #[error("coupon discount could not be calculated")]
    InvalidDiscount,
}

/// What a coupon takes off an order.
#[derive(Debug, Clone, Copy)]
pub enum CouponValue {
    /// A percentage of the order total (e.g., "10% off")
    Percent(Percentage),

    /// A fixed amount off the order total (e.g., "50,000₫ off")
    Amount(Price),
}

impl CouponValue {
    /// Build a percentage value from the number of percentage points, e.g. `10.0` for 10% off.
    ///
    /// Returns `None` when `points` is not finite or does not fit a `Decimal`.
    pub fn percent_points(points: f64) -> Option<Self> {
        let fraction = Decimal::from_f64(points)?.checked_div(Decimal::ONE_HUNDRED)?;

        Some(Self::Percent(Percentage::from(fraction)))
    }
}

/// A discount code with a validity window and a usage cap.
#[derive(Debug, Clone)]
pub struct Coupon {
    /// Normalised coupon code
    pub code: String,

    /// Discount value
    pub value: CouponValue,

    /// Start of the validity window (inclusive)
    pub valid_from: Timestamp,

    /// End of the validity window (inclusive)
    pub valid_to: Timestamp,

    /// Maximum number of redemptions
    pub usage_limit: u32,

    /// Number of redemptions so far
    pub used_count: u32,

    /// Minimum order total, if any
    pub minimum_order: Option<Price>,
}

/// A coupon successfully applied to an order total.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    /// Code that was applied
    pub code: String,

    /// Amount taken off
    pub discount: Price,

    /// Order total after the discount, never negative
    pub total: Price,
}

/// Trim and upper-case a coupon code; `None` when it is blank.
pub fn normalize_code(code: &str) -> Option<String> {
    let code = code.trim();

    (!code.is_empty()).then(|| code.to_uppercase())
}

impl Coupon {
    /// Check the validity window and usage cap at `now`.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a `CouponRejection`.
    pub fn check_validity(&self, now: Timestamp) -> Result<(), CouponRejection> {
        if now < self.valid_from {
            return Err(CouponRejection::NotYetValid(self.valid_from));
        }

        if now > self.valid_to {
            return Err(CouponRejection::Expired(self.valid_to));
        }

        if self.used_count >= self.usage_limit {
            return Err(CouponRejection::UsageExhausted);
        }

        Ok(())
    }

    /// The discount this coupon gives on `order_total`, capped at the total.
    ///
    /// # Errors
    ///
    /// Returns `CouponRejection::CurrencyMismatch` for a fixed amount in another currency and
    /// `CouponRejection::InvalidDiscount` if a percentage cannot be represented.
    pub fn discount_for(&self, order_total: Price) -> Result<Price, CouponRejection> {
        let order_total = non_negative(order_total);

        let discount = match self.value {
            CouponValue::Percent(percent) => {
                let minor = percent_of_minor(&percent, order_total.to_minor_units())
                    .map_err(|_err| CouponRejection::InvalidDiscount)?;

                Price::from_minor(minor, order_total.currency())
            }
            CouponValue::Amount(amount) => {
                if amount.currency() != order_total.currency() {
                    return Err(CouponRejection::CurrencyMismatch(
                        order_total.currency().iso_alpha_code,
                    ));
                }

                amount
            }
        };

        Ok(min_price(non_negative(discount), order_total))
    }

    /// Validate the coupon at `now` and apply it to `order_total`.
    ///
    /// # Errors
    ///
    /// Returns a `CouponRejection` describing why the coupon cannot be used.
    pub fn apply(
        &self,
        order_total: Price,
        now: Timestamp,
    ) -> Result<AppliedCoupon, CouponRejection> {
        self.check_validity(now)?;

        if let Some(minimum) = self.minimum_order {
            if minimum.currency() != order_total.currency() {
                return Err(CouponRejection::CurrencyMismatch(
                    order_total.currency().iso_alpha_code,
                ));
            }

            if order_total.to_minor_units() < minimum.to_minor_units() {
                return Err(CouponRejection::BelowMinimum(minimum));
            }
        }

        let order_total = non_negative(order_total);
        let discount = self.discount_for(order_total)?;

        let total = order_total
            .sub(discount)
            .map_err(|_err| CouponRejection::InvalidDiscount)?;

        Ok(AppliedCoupon {
            code: self.code.clone(),
            discount,
            total,
        })
    }
}
