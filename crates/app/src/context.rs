//! App Context

use std::sync::Arc;

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    api::{ApiClient, ApiConfig, ApiError},
    domain::{
        carts::{CartSource, HttpCartSource},
        catalog::{HttpProductCatalog, ProductCatalog},
        checkout::CheckoutService,
        coupons::{CouponDirectory, HttpCouponDirectory},
        pricing::{CartPricing, PricedCartReceiver},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to create storefront API client")]
    Api(#[source] ApiError),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn ProductCatalog>,
    pub carts: Arc<dyn CartSource>,
    pub coupons: Arc<dyn CouponDirectory>,
    pub currency: &'static Currency,
}

impl AppContext {
    /// Build application context backed by the storefront API.
    ///
    /// # Errors
    ///
    /// Returns an error when the API client cannot be created.
    pub fn from_api_config(
        config: &ApiConfig,
        currency: &'static Currency,
    ) -> Result<Self, AppInitError> {
        let api = ApiClient::new(config).map_err(AppInitError::Api)?;

        Ok(Self {
            catalog: Arc::new(HttpProductCatalog::new(api.clone(), currency)),
            carts: Arc::new(HttpCartSource::new(api.clone(), currency)),
            coupons: Arc::new(HttpCouponDirectory::new(api, currency)),
            currency,
        })
    }

    /// A checkout service with a fresh meta cache.
    #[must_use]
    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(Arc::clone(&self.catalog), Arc::clone(&self.coupons), self.currency)
    }

    /// A cart pricing view with a fresh meta cache.
    #[must_use]
    pub fn cart_pricing(&self) -> (CartPricing, PricedCartReceiver) {
        CartPricing::new(Arc::clone(&self.catalog), self.currency)
    }
}
