//! Coupons

pub mod errors;
pub mod service;

pub use errors::CouponDirectoryError;
pub use service::*;
