//! Coupons service.

use async_trait::async_trait;
use hamper::{
    coupons::{AppliedCoupon, Coupon, CouponRejection, normalize_code},
    prices::Price,
};
use jiff::Timestamp;
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::{info, warn};

use crate::{
    api::{ApiClient, records::CouponRecord},
    domain::coupons::errors::CouponDirectoryError,
};

/// Looks coupons up through the storefront API.
#[derive(Debug, Clone)]
pub struct HttpCouponDirectory {
    api: ApiClient,
    currency: &'static Currency,
}

impl HttpCouponDirectory {
    #[must_use]
    pub fn new(api: ApiClient, currency: &'static Currency) -> Self {
        Self { api, currency }
    }
}

#[async_trait]
impl CouponDirectory for HttpCouponDirectory {
    #[tracing::instrument(name = "coupons.service.find_coupon", skip(self), err)]
    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, CouponDirectoryError> {
        let record: Option<CouponRecord> = self.api.get_json(&["coupons", code]).await?;

        Ok(record
            .map(|record| record.into_coupon(self.currency))
            .transpose()?)
    }
}

#[automock]
#[async_trait]
pub trait CouponDirectory: Send + Sync {
    /// Find a coupon by its normalised code. `Ok(None)` when the code does not exist.
    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, CouponDirectoryError>;
}

/// Look a code up and apply it to `order_total` at `now`.
///
/// Lookup failures are logged and reported as `CouponRejection::Unavailable`, so callers
/// always get a displayable outcome.
///
/// # Errors
///
/// Returns a `CouponRejection` when the coupon cannot be applied.
#[tracing::instrument(name = "coupons.redeem", skip(directory, order_total))]
pub async fn redeem(
    directory: &dyn CouponDirectory,
    code: &str,
    order_total: Price,
    now: Timestamp,
) -> Result<AppliedCoupon, CouponRejection> {
    let code = normalize_code(code).ok_or(CouponRejection::EmptyCode)?;

    let coupon = match directory.find_coupon(&code).await {
        Ok(Some(coupon)) => coupon,
        Ok(None) => return Err(CouponRejection::NotFound),
        Err(error) => {
            warn!(%code, %error, "coupon lookup failed");

            return Err(CouponRejection::Unavailable);
        }
    };

    let outcome = coupon.apply(order_total, now);

    match &outcome {
        Ok(applied) => info!(%code, discount = %applied.discount, "coupon applied"),
        Err(rejection) => info!(%code, %rejection, "coupon rejected"),
    }

    outcome
}
