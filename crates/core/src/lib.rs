//! Hamper
//!
//! Storefront pricing for a picnic and outdoor goods shop: cart lines priced
//! against live catalogue data, coupons, group-buy campaigns and shared carts.

pub mod cart;
pub mod coupons;
pub mod discounts;
pub mod enrichment;
pub mod group_buy;
pub mod meta;
pub mod prelude;
pub mod prices;
pub mod products;
pub mod receipt;
pub mod shared_cart;
