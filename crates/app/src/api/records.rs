//! Storefront API records.
//!
//! Wire shapes returned by the storefront API, and their conversion into
//! domain values. Amounts arrive in major units of the shop currency.

use hamper::{
    cart::{CartLineItem, CartSnapshot},
    coupons::{Coupon, CouponValue, normalize_code},
    discounts::DiscountRate,
    group_buy::{CampaignId, GroupBuyCampaign},
    prices::{Price, price_from_major},
    products::{ProductDetail, ProductId},
};
use jiff::Timestamp;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use super::RecordError;

fn amount(
    value: f64,
    field: &'static str,
    currency: &'static Currency,
) -> Result<Price, RecordError> {
    price_from_major(value, currency).ok_or(RecordError::InvalidAmount(field))
}

/// `GET /products/{id}` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    pub price: f64,
    #[serde(default)]
    pub discount_rate: Option<f64>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}

impl ProductRecord {
    /// Convert into a product detail priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidAmount` if the price cannot be represented.
    pub fn into_detail(self, currency: &'static Currency) -> Result<ProductDetail, RecordError> {
        Ok(ProductDetail {
            id: self.id,
            price: amount(self.price, "price", currency)?,
            discount_rate: DiscountRate::from_fraction(self.discount_rate.unwrap_or(0.0)),
            stock_quantity: self
                .stock_quantity
                .map(|stock| u32::try_from(stock.max(0)).unwrap_or(u32::MAX)),
        })
    }
}

/// One line of the `GET /cart` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRecord {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub product_image_url: Option<String>,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub subtotal: Option<f64>,
}

impl CartLineRecord {
    /// Convert into a cart line priced in `currency`.
    ///
    /// A missing subtotal is derived from price and quantity.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidAmount` if an amount cannot be represented.
    pub fn into_item(self, currency: &'static Currency) -> Result<CartLineItem, RecordError> {
        let mut item = CartLineItem::new(
            self.product_id,
            self.product_name,
            amount(self.price, "price", currency)?,
            self.quantity,
        );

        item.product_image_url = self.product_image_url;

        if let Some(subtotal) = self.subtotal {
            item.subtotal = amount(subtotal, "subtotal", currency)?;
        }

        Ok(item)
    }
}

/// `GET /cart` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartRecord {
    #[serde(default)]
    pub items: Vec<CartLineRecord>,
}

impl CartRecord {
    /// Convert into a cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns a `RecordError` if any line cannot be converted.
    pub fn into_snapshot(self, currency: &'static Currency) -> Result<CartSnapshot, RecordError> {
        let items = self
            .items
            .into_iter()
            .map(|line| line.into_item(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CartSnapshot::with_items(items, currency)?)
    }
}

/// `GET /coupons/{code}` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRecord {
    pub code: String,
    pub discount_value: f64,
    pub is_percent: bool,
    pub valid_from: Timestamp,
    pub valid_to: Timestamp,
    pub usage_limit: u32,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default)]
    pub minimum_order: Option<f64>,
}

impl CouponRecord {
    /// Convert into a coupon. Percentage values are percentage points (`10` is 10% off).
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidAmount` if the value or minimum cannot be represented.
    pub fn into_coupon(self, currency: &'static Currency) -> Result<Coupon, RecordError> {
        let value = if self.is_percent {
            CouponValue::percent_points(self.discount_value)
                .ok_or(RecordError::InvalidAmount("discountValue"))?
        } else {
            CouponValue::Amount(amount(self.discount_value, "discountValue", currency)?)
        };

        let minimum_order = self
            .minimum_order
            .map(|minimum| amount(minimum, "minimumOrder", currency))
            .transpose()?;

        Ok(Coupon {
            code: normalize_code(&self.code).unwrap_or_default(),
            value,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            usage_limit: self.usage_limit,
            used_count: self.used_count,
            minimum_order,
        })
    }
}

/// Group-buy campaign body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRecord {
    pub id: CampaignId,
    pub product_id: ProductId,
    pub regular_price: f64,
    pub group_price: f64,
    pub target_quantity: u32,
    #[serde(default)]
    pub committed_quantity: u32,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

impl CampaignRecord {
    /// Convert into a campaign priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidAmount` if a price cannot be represented.
    pub fn into_campaign(
        self,
        currency: &'static Currency,
    ) -> Result<GroupBuyCampaign, RecordError> {
        Ok(GroupBuyCampaign {
            id: self.id,
            product_id: self.product_id,
            regular_price: amount(self.regular_price, "regularPrice", currency)?,
            group_price: amount(self.group_price, "groupPrice", currency)?,
            target_quantity: self.target_quantity,
            committed_quantity: self.committed_quantity,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::VND};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_record_reads_camel_case() -> TestResult {
        let record: ProductRecord = serde_json::from_str(
            r#"{"id":5,"price":100000,"discountRate":0.2,"stockQuantity":7,"slug":"hamper"}"#,
        )?;

        let detail = record.into_detail(VND)?;

        assert_eq!(detail.id, ProductId::new(5));
        assert_eq!(detail.price, Money::from_minor(100_000, VND));
        assert_eq!(detail.discount_rate, DiscountRate::from_fraction(0.2));
        assert_eq!(detail.stock_quantity, Some(7));

        Ok(())
    }

    #[test]
    fn product_record_defaults_optional_fields() -> TestResult {
        let record: ProductRecord = serde_json::from_str(r#"{"id":1,"price":9000}"#)?;
        let detail = record.into_detail(VND)?;

        assert_eq!(detail.discount_rate, DiscountRate::none());
        assert!(detail.stock_quantity.is_none());

        Ok(())
    }

    #[test]
    fn negative_stock_reads_as_zero() -> TestResult {
        let record: ProductRecord =
            serde_json::from_str(r#"{"id":1,"price":9000,"stockQuantity":-3}"#)?;

        assert_eq!(record.into_detail(VND)?.stock_quantity, Some(0));

        Ok(())
    }

    #[test]
    fn cart_record_derives_missing_subtotals() -> TestResult {
        let record: CartRecord = serde_json::from_str(
            r#"{"items":[
                {"productId":5,"productName":"Hamper","price":100000,"quantity":3},
                {"productId":9,"productName":"Mat","productImageUrl":"/m.png",
                 "price":50000,"quantity":0,"subtotal":0}
            ]}"#,
        )?;

        let cart = record.into_snapshot(VND)?;
        let items = cart.items();

        assert_eq!(items.len(), 2);
        assert_eq!(items.first().map(|i| i.subtotal), Some(Money::from_minor(300_000, VND)));
        assert_eq!(
            items.get(1).and_then(|i| i.product_image_url.as_deref()),
            Some("/m.png")
        );

        Ok(())
    }

    #[test]
    fn coupon_record_converts_percent_points() -> TestResult {
        let record: CouponRecord = serde_json::from_str(
            r#"{"code":" picnic10 ","discountValue":10,"isPercent":true,
                "validFrom":"2026-06-01T00:00:00Z","validTo":"2026-08-31T00:00:00Z",
                "usageLimit":50,"usedCount":2}"#,
        )?;

        let coupon = record.into_coupon(VND)?;
        let applied = coupon.apply(
            Money::from_minor(200_000, VND),
            "2026-07-01T00:00:00Z".parse()?,
        )?;

        assert_eq!(coupon.code, "PICNIC10");
        assert_eq!(applied.discount, Money::from_minor(20_000, VND));

        Ok(())
    }

    #[test]
    fn coupon_record_with_flat_value_and_minimum() -> TestResult {
        let record: CouponRecord = serde_json::from_str(
            r#"{"code":"FLAT50","discountValue":50000,"isPercent":false,
                "validFrom":"2026-06-01T00:00:00Z","validTo":"2026-08-31T00:00:00Z",
                "usageLimit":1,"minimumOrder":20000}"#,
        )?;

        let coupon = record.into_coupon(VND)?;

        assert!(matches!(
            coupon.value,
            CouponValue::Amount(amount) if amount == Money::from_minor(50_000, VND)
        ));
        assert_eq!(coupon.minimum_order, Some(Money::from_minor(20_000, VND)));
        assert_eq!(coupon.used_count, 0);

        Ok(())
    }

    #[test]
    fn coupon_record_with_out_of_range_percent_is_invalid() -> TestResult {
        let record: CouponRecord = serde_json::from_str(
            r#"{"code":"HUGE","discountValue":1e300,"isPercent":true,
                "validFrom":"2026-06-01T00:00:00Z","validTo":"2026-08-31T00:00:00Z",
                "usageLimit":5}"#,
        )?;

        assert_eq!(
            record.into_coupon(VND).err(),
            Some(RecordError::InvalidAmount("discountValue"))
        );

        Ok(())
    }

    #[test]
    fn campaign_record_converts_prices() -> TestResult {
        let record: CampaignRecord = serde_json::from_str(
            r#"{"id":3,"productId":30,"regularPrice":400000,"groupPrice":320000,
                "targetQuantity":20,"committedQuantity":4,
                "startsAt":"2026-05-01T00:00:00Z","endsAt":"2026-05-14T00:00:00Z"}"#,
        )?;

        let campaign = record.into_campaign(VND)?;

        assert_eq!(campaign.group_price, Money::from_minor(320_000, VND));
        assert_eq!(campaign.remaining(), 16);

        Ok(())
    }
}
