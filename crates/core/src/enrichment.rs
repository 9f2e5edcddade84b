//! Enrichment
//!
//! Projects server cart lines through the meta table into display-ready,
//! priced lines. The projection is pure: the same items and table always give
//! the same priced cart.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::CartLineItem,
    discounts::DiscountRate,
    meta::{MetaEntry, MetaTable},
    prices::{Price, checked_times, non_negative},
    products::ProductId,
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// An item's currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line subtotal does not fit into minor units.
    #[error("subtotal for product {0} overflowed")]
    Overflow(ProductId),

    /// The cart total does not fit into minor units.
    #[error("cart total overflowed")]
    TotalOverflow,
}

/// Where a line's unit price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// Live catalogue price after the product discount.
    Live,

    /// Server cart snapshot, used when live data is missing or unusable.
    Snapshot,
}

/// A cart line with its resolved price.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedCartLineItem {
    /// Product in the line
    pub product_id: ProductId,

    /// Product display name
    pub product_name: String,

    /// Product image, if any
    pub product_image_url: Option<String>,

    /// Server snapshot unit price
    pub original_price: Price,

    /// Resolved unit price
    pub price: Price,

    /// Quantity reported by the server
    pub quantity: i64,

    /// Quantity the subtotal was computed with
    pub billed_quantity: i64,

    /// Resolved unit price times billed quantity
    pub subtotal: Price,

    /// Units in stock, when known
    pub stock_quantity: Option<u32>,

    /// Product discount rate, zero when unknown
    pub discount_rate: DiscountRate,

    /// Origin of the unit price
    pub price_source: PriceSource,
}

impl EnhancedCartLineItem {
    /// Whether the billed quantity exceeds the known stock.
    pub fn exceeds_stock(&self) -> bool {
        self.stock_quantity
            .is_some_and(|stock| i64::from(stock) < self.billed_quantity)
    }
}

/// A fully priced cart.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCart {
    items: Vec<EnhancedCartLineItem>,
    total: Price,
    meta_version: u64,
}

impl PricedCart {
    /// Priced lines in cart order.
    pub fn items(&self) -> &[EnhancedCartLineItem] {
        &self.items
    }

    /// Iterate over the priced lines.
    pub fn iter(&self) -> impl Iterator<Item = &EnhancedCartLineItem> {
        self.items.iter()
    }

    /// Sum of the line subtotals.
    pub fn total(&self) -> Price {
        self.total
    }

    /// Version of the meta table the cart was priced against.
    pub fn meta_version(&self) -> u64 {
        self.meta_version
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.total.currency()
    }
}

/// The unit price for a line given its meta entry.
///
/// Uses the live price when the entry resolved to a positive price; otherwise the server
/// snapshot floored at zero.
pub fn resolve_unit_price(item: &CartLineItem, entry: Option<&MetaEntry>) -> (Price, PriceSource) {
    match entry.and_then(MetaEntry::live_price) {
        Some(price) if price.currency() == item.price.currency() => (price, PriceSource::Live),
        _ => (non_negative(item.price), PriceSource::Snapshot),
    }
}

/// Price a single line against the meta table.
///
/// # Errors
///
/// Returns `EnrichmentError::Overflow` if the subtotal cannot be represented.
pub fn enrich_item(
    item: &CartLineItem,
    meta: &MetaTable,
) -> Result<EnhancedCartLineItem, EnrichmentError> {
    let entry = meta.get(item.product_id);
    let (price, price_source) = resolve_unit_price(item, entry);
    let billed_quantity = item.billed_quantity();

    let subtotal =
        checked_times(price, billed_quantity).ok_or(EnrichmentError::Overflow(item.product_id))?;

    let resolved = entry.and_then(MetaEntry::resolved);

    Ok(EnhancedCartLineItem {
        product_id: item.product_id,
        product_name: item.product_name.clone(),
        product_image_url: item.product_image_url.clone(),
        original_price: item.price,
        price,
        quantity: item.quantity,
        billed_quantity,
        subtotal,
        stock_quantity: resolved.and_then(|meta| meta.stock_quantity),
        discount_rate: resolved.map(|meta| meta.discount_rate).unwrap_or_default(),
        price_source,
    })
}

/// Price every line of a cart and total the subtotals.
///
/// # Errors
///
/// - [`EnrichmentError::CurrencyMismatch`]: a line is priced in another currency.
/// - [`EnrichmentError::Overflow`]: a subtotal cannot be represented.
/// - [`EnrichmentError::TotalOverflow`]: the total cannot be represented.
pub fn enrich(
    items: &[CartLineItem],
    meta: &MetaTable,
    currency: &'static Currency,
) -> Result<PricedCart, EnrichmentError> {
    let items = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item_currency = item.price.currency();

            if item_currency == currency {
                enrich_item(item, meta)
            } else {
                Err(EnrichmentError::CurrencyMismatch(
                    i,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total_minor = items
        .iter()
        .try_fold(0_i64, |acc, item| acc.checked_add(item.subtotal.to_minor_units()))
        .ok_or(EnrichmentError::TotalOverflow)?;

    Ok(PricedCart {
        items,
        total: Money::from_minor(total_minor, currency),
        meta_version: meta.version(),
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::VND};
    use testresult::TestResult;

    use crate::meta::ProductMeta;

    use super::*;

    fn vnd(minor: i64) -> Price {
        Money::from_minor(minor, VND)
    }

    fn resolved(price: i64, rate: f64) -> MetaEntry {
        MetaEntry::Resolved(ProductMeta {
            final_price: vnd(price),
            stock_quantity: Some(12),
            discount_rate: DiscountRate::from_fraction(rate),
        })
    }

    #[test]
    fn live_price_replaces_snapshot_price() -> TestResult {
        let mut meta = MetaTable::new();
        meta.commit([(ProductId::new(5), resolved(80_000, 0.2))]);

        let items = [CartLineItem::new(ProductId::new(5), "Hamper", vnd(100_000), 3)];
        let cart = enrich(&items, &meta, VND)?;

        let line = cart.items().first().ok_or("missing line")?;

        assert_eq!(line.price, vnd(80_000));
        assert_eq!(line.original_price, vnd(100_000));
        assert_eq!(line.subtotal, vnd(240_000));
        assert_eq!(line.discount_rate, DiscountRate::from_fraction(0.2));
        assert_eq!(line.stock_quantity, Some(12));
        assert_eq!(line.price_source, PriceSource::Live);
        assert_eq!(cart.total(), vnd(240_000));

        Ok(())
    }

    #[test]
    fn missing_meta_falls_back_and_clamps_quantity() -> TestResult {
        let items = [CartLineItem::new(ProductId::new(9), "Mat", vnd(50_000), 0)];
        let cart = enrich(&items, &MetaTable::new(), VND)?;

        let line = cart.items().first().ok_or("missing line")?;

        assert_eq!(line.price, vnd(50_000));
        assert_eq!(line.billed_quantity, 1);
        assert_eq!(line.subtotal, vnd(50_000));
        assert_eq!(line.price_source, PriceSource::Snapshot);
        assert_eq!(line.discount_rate, DiscountRate::none());
        assert!(line.stock_quantity.is_none());

        Ok(())
    }

    #[test]
    fn failed_or_zero_meta_falls_back_to_floored_snapshot() -> TestResult {
        let mut meta = MetaTable::new();
        meta.commit([
            (ProductId::new(1), MetaEntry::Failed),
            (ProductId::new(2), resolved(0, 0.0)),
        ]);

        let items = [
            CartLineItem::new(ProductId::new(1), "Cups", vnd(-3_000), 2),
            CartLineItem::new(ProductId::new(2), "Plates", vnd(7_000), 2),
        ];

        let cart = enrich(&items, &meta, VND)?;
        let prices: Vec<_> = cart.iter().map(|line| line.price).collect();

        assert_eq!(prices, vec![vnd(0), vnd(7_000)]);
        assert_eq!(cart.total(), vnd(14_000));

        Ok(())
    }

    #[test]
    fn total_is_exact_sum_of_subtotals() -> TestResult {
        let mut meta = MetaTable::new();
        meta.commit([(ProductId::new(1), resolved(33_333, 0.1))]);

        let items = [
            CartLineItem::new(ProductId::new(1), "Thermos", vnd(37_037), 3),
            CartLineItem::new(ProductId::new(2), "Napkins", vnd(1_001), 7),
            CartLineItem::new(ProductId::new(3), "Umbrella", vnd(250_000), 1),
        ];

        let cart = enrich(&items, &meta, VND)?;
        let sum: i64 = cart.iter().map(|line| line.subtotal.to_minor_units()).sum();

        assert_eq!(cart.total().to_minor_units(), sum);
        assert_eq!(sum, 99_999 + 7_007 + 250_000);

        Ok(())
    }

    #[test]
    fn empty_cart_totals_zero() -> TestResult {
        let cart = enrich(&[], &MetaTable::new(), VND)?;

        assert!(cart.is_empty());
        assert_eq!(cart.total(), vnd(0));

        Ok(())
    }

    #[test]
    fn priced_cart_records_meta_version() -> TestResult {
        let mut meta = MetaTable::new();
        meta.commit([(ProductId::new(1), MetaEntry::Failed)]);

        let cart = enrich(&[], &meta, VND)?;

        assert_eq!(cart.meta_version(), 1);

        Ok(())
    }

    #[test]
    fn overflowing_subtotal_errors() {
        let items = [CartLineItem::new(ProductId::new(4), "Gazebo", vnd(i64::MAX), 2)];

        let result = enrich(&items, &MetaTable::new(), VND);

        assert!(matches!(result, Err(EnrichmentError::Overflow(id)) if id == ProductId::new(4)));
    }

    #[test]
    fn overflowing_total_errors() {
        let half = i64::MAX / 2 + 10;
        let items = [
            CartLineItem::new(ProductId::new(4), "Gazebo", vnd(half), 1),
            CartLineItem::new(ProductId::new(5), "Marquee", vnd(half), 1),
        ];

        let result = enrich(&items, &MetaTable::new(), VND);

        assert!(
            matches!(result, Err(EnrichmentError::TotalOverflow)),
            "expected total overflow, got {result:?}"
        );
    }

    #[test]
    fn exceeds_stock_compares_billed_quantity() -> TestResult {
        let mut meta = MetaTable::new();
        meta.commit([(ProductId::new(1), resolved(1_000, 0.0))]);

        let items = [CartLineItem::new(ProductId::new(1), "Grill", vnd(1_000), 13)];
        let cart = enrich(&items, &meta, VND)?;

        assert!(cart.items().first().is_some_and(EnhancedCartLineItem::exceeds_stock));

        Ok(())
    }
}
