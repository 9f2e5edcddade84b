//! Coupon directory errors.

use thiserror::Error;

use crate::api::{ApiError, RecordError};

#[derive(Debug, Error)]
pub enum CouponDirectoryError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid coupon record")]
    Record(#[from] RecordError),
}
