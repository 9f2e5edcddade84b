//! Prices

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};

/// An amount of money in the shop currency, held in minor units.
pub type Price = Money<'static, Currency>;

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Price {
    Money::from_minor(0, currency)
}

/// Convert a major-unit amount, as reported by the storefront API, into a price.
///
/// Returns `None` when the amount is not finite or does not fit into `i64` minor units.
pub fn price_from_major(amount: f64, currency: &'static Currency) -> Option<Price> {
    let scale = 10_i64.checked_pow(currency.exponent)?;

    Decimal::from_f64(amount)?
        .checked_mul(Decimal::from(scale))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(|minor| Money::from_minor(minor, currency))
}

/// Floor a price at zero.
pub fn non_negative(price: Price) -> Price {
    if price.to_minor_units() < 0 {
        zero(price.currency())
    } else {
        price
    }
}

/// Multiply a unit price by a quantity, returning `None` on overflow.
pub fn checked_times(price: Price, quantity: i64) -> Option<Price> {
    price
        .to_minor_units()
        .checked_mul(quantity)
        .map(|minor| Money::from_minor(minor, price.currency()))
}

/// The smaller of two prices in the same currency.
pub fn min_price(a: Price, b: Price) -> Price {
    if a.to_minor_units() <= b.to_minor_units() {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, VND};

    use super::*;

    #[test]
    fn price_from_major_scales_by_currency_exponent() {
        assert_eq!(
            price_from_major(19.99, GBP),
            Some(Money::from_minor(1999, GBP))
        );

        assert_eq!(
            price_from_major(100_000.0, VND),
            Some(Money::from_minor(100_000, VND))
        );
    }

    #[test]
    fn price_from_major_rejects_non_finite_amounts() {
        assert_eq!(price_from_major(f64::NAN, GBP), None);
        assert_eq!(price_from_major(f64::INFINITY, GBP), None);
    }

    #[test]
    fn price_from_major_rejects_amounts_beyond_minor_unit_range() {
        assert_eq!(price_from_major(1e30, GBP), None);
    }

    #[test]
    fn non_negative_floors_at_zero() {
        assert_eq!(non_negative(Money::from_minor(-5, GBP)), zero(GBP));
        assert_eq!(
            non_negative(Money::from_minor(5, GBP)),
            Money::from_minor(5, GBP)
        );
    }

    #[test]
    fn checked_times_detects_overflow() {
        assert_eq!(checked_times(Money::from_minor(i64::MAX, GBP), 2), None);
        assert_eq!(
            checked_times(Money::from_minor(250, GBP), 3),
            Some(Money::from_minor(750, GBP))
        );
    }
}
