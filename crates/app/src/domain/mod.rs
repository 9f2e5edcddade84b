//! Hamper Domain Concerns

pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod preferences;
pub mod pricing;
