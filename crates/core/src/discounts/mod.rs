//! Discount utilities
//!
//! Discount rates as reported by the catalogue, and the rounding rules used
//! whenever a rate is turned into money.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError};
use thiserror::Error;

use crate::prices::Price;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A product discount rate, always within `[0, 1]`.
#[derive(Copy, Clone)]
pub struct DiscountRate {
    percentage: Percentage,
}

impl DiscountRate {
    /// No discount.
    pub fn none() -> Self {
        Self {
            percentage: Percentage::from(0.0),
        }
    }

    /// Build a rate from a fraction such as `0.2` for 20% off.
    ///
    /// Values outside `[0, 1]` are clamped and non-finite values count as no discount,
    /// so arbitrary catalogue data never produces a negative price.
    pub fn from_fraction(fraction: f64) -> Self {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            percentage: Percentage::from(fraction),
        }
    }

    /// The rate as a decimal fraction.
    pub fn value(&self) -> Decimal {
        // decimal_percentage doesn't expose the underlying Decimal
        self.percentage * Decimal::ONE
    }

    /// Whether the rate reduces the price at all.
    pub fn is_discounted(&self) -> bool {
        self.value() > Decimal::ZERO
    }

    /// The rate as a percentage.
    pub fn percentage(&self) -> &Percentage {
        &self.percentage
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        Self::none()
    }
}

impl PartialEq for DiscountRate {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl fmt::Debug for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DiscountRate").field(&self.value()).finish()
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns an error if the percentage calculation overflows or cannot be safely represented
/// (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Apply a discount rate to a price: `price * (1 - rate)`, with the discount amount rounded
/// half away from zero to the currency's minor unit.
///
/// # Errors
///
/// Returns an error if the discount amount cannot be represented or the subtraction fails.
pub fn discounted_price(price: Price, rate: &DiscountRate) -> Result<Price, DiscountError> {
    if !rate.is_discounted() {
        return Ok(price);
    }

    let discount_minor = percent_of_minor(rate.percentage(), price.to_minor_units())?;

    Ok(price.sub(Money::from_minor(discount_minor, price.currency()))?)
}
