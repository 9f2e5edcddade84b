//! Hamper prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartLineItem, CartSnapshot},
    coupons::{AppliedCoupon, Coupon, CouponRejection, CouponValue, normalize_code},
    discounts::{DiscountError, DiscountRate},
    enrichment::{EnhancedCartLineItem, EnrichmentError, PriceSource, PricedCart, enrich},
    group_buy::{CampaignId, CampaignStatus, CommitError, GroupBuyCampaign},
    meta::{MetaEntry, MetaTable, ProductMeta},
    prices::{Price, price_from_major},
    products::{ProductDetail, ProductId},
    receipt::{Receipt, ReceiptError},
    shared_cart::{MemberId, MemberShare, SharedCart, SharedCartError, SharedCartSplit},
};
