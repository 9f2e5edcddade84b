//! Cart pricing view.

use std::sync::Arc;

use hamper::{
    cart::CartLineItem,
    enrichment::{EnrichmentError, PricedCart, enrich},
};
use rusty_money::iso::Currency;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::{catalog::ProductCatalog, pricing::cache::MetaCache};

/// Latest priced cart, `None` until the first refresh.
pub type PricedCartReceiver = watch::Receiver<Option<Arc<PricedCart>>>;

/// Owns a cart's items and meta cache and publishes the cart re-priced after each refresh.
///
/// Dropping every [`PricedCartReceiver`] tears the view down: later refreshes still fill the
/// cache but no longer price or publish the cart.
pub struct CartPricing {
    catalog: Arc<dyn ProductCatalog>,
    cache: MetaCache,
    items: Vec<CartLineItem>,
    currency: &'static Currency,
    priced: watch::Sender<Option<Arc<PricedCart>>>,
}

impl CartPricing {
    /// New view for a cart in `currency`, with its first subscriber.
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        currency: &'static Currency,
    ) -> (Self, PricedCartReceiver) {
        let (priced, receiver) = watch::channel(None);

        let view = Self {
            catalog,
            cache: MetaCache::new(),
            items: Vec::new(),
            currency,
            priced,
        };

        (view, receiver)
    }

    /// Another subscriber to the priced cart.
    pub fn subscribe(&self) -> PricedCartReceiver {
        self.priced.subscribe()
    }

    /// Whether every subscriber has gone.
    pub fn is_closed(&self) -> bool {
        self.priced.is_closed()
    }

    /// Replace the cart items. Takes effect on the next refresh.
    pub fn set_items(&mut self, items: impl Into<Vec<CartLineItem>>) {
        self.items = items.into();
    }

    /// Current cart items.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The view's meta cache.
    pub fn cache(&self) -> &MetaCache {
        &self.cache
    }

    /// Price the current items against what is cached, without fetching.
    ///
    /// # Errors
    ///
    /// Returns an `EnrichmentError` if the items cannot be priced.
    pub fn price_now(&self) -> Result<PricedCart, EnrichmentError> {
        enrich(&self.items, self.cache.table(), self.currency)
    }

    /// Fill the cache for the current items, then re-price and publish the cart.
    ///
    /// Returns `None` without pricing when the view has been torn down.
    ///
    /// # Errors
    ///
    /// Returns an `EnrichmentError` if the items cannot be priced.
    #[tracing::instrument(
        name = "pricing.view.refresh",
        skip(self),
        fields(line_count = self.items.len()),
        err
    )]
    pub async fn refresh(&mut self) -> Result<Option<Arc<PricedCart>>, EnrichmentError> {
        let report = self.cache.sync(self.catalog.as_ref(), &self.items).await;

        if self.priced.is_closed() {
            debug!(version = report.version, "no subscribers; skipping re-price");

            return Ok(None);
        }

        let cart = Arc::new(self.price_now()?);

        self.priced.send_replace(Some(Arc::clone(&cart)));

        Ok(Some(cart))
    }
}

#[cfg(test)]
mod tests {
    use hamper::{
        discounts::DiscountRate,
        enrichment::PriceSource,
        products::{ProductDetail, ProductId},
    };
    use rusty_money::{Money, iso::VND};
    use testresult::TestResult;

    use crate::domain::catalog::MockProductCatalog;

    use super::*;

    fn catalog(times: usize) -> Arc<dyn ProductCatalog> {
        let mut catalog = MockProductCatalog::new();

        catalog
            .expect_product_detail()
            .times(times)
            .returning(|id| {
                Ok(ProductDetail {
                    id,
                    price: Money::from_minor(100_000, VND),
                    discount_rate: DiscountRate::from_fraction(0.2),
                    stock_quantity: Some(10),
                })
            });

        Arc::new(catalog)
    }

    fn hamper_line(quantity: i64) -> CartLineItem {
        CartLineItem::new(
            ProductId::new(5),
            "Picnic hamper",
            Money::from_minor(100_000, VND),
            quantity,
        )
    }

    #[tokio::test]
    async fn refresh_publishes_live_prices() -> TestResult {
        let (mut view, mut priced) = CartPricing::new(catalog(1), VND);

        view.set_items([hamper_line(3)]);

        let cart = view.refresh().await?.ok_or("view should be open")?;

        assert_eq!(cart.total(), Money::from_minor(240_000, VND));
        assert_eq!(cart.meta_version(), 1);
        assert_eq!(
            cart.items().first().map(|line| line.price_source),
            Some(PriceSource::Live)
        );

        let published = priced.borrow_and_update().clone().ok_or("nothing published")?;

        assert_eq!(published.total(), cart.total());

        Ok(())
    }

    #[tokio::test]
    async fn quantity_change_reprices_without_refetching() -> TestResult {
        let (mut view, _priced) = CartPricing::new(catalog(1), VND);

        view.set_items([hamper_line(1)]);
        view.refresh().await?;

        view.set_items([hamper_line(2)]);
        let cart = view.refresh().await?.ok_or("view should be open")?;

        assert_eq!(cart.total(), Money::from_minor(160_000, VND));
        assert_eq!(cart.meta_version(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn dropped_subscribers_skip_repricing_but_fill_cache() -> TestResult {
        let (mut view, priced) = CartPricing::new(catalog(1), VND);

        drop(priced);
        view.set_items([hamper_line(1)]);

        assert!(view.is_closed());
        assert!(view.refresh().await?.is_none());
        assert!(view.cache().table().contains(ProductId::new(5)));

        Ok(())
    }

    #[tokio::test]
    async fn price_now_uses_snapshot_before_first_refresh() -> TestResult {
        let (mut view, _priced) = CartPricing::new(catalog(0), VND);

        view.set_items([hamper_line(0)]);

        let cart = view.price_now()?;

        assert_eq!(cart.total(), Money::from_minor(100_000, VND));
        assert_eq!(cart.meta_version(), 0);

        Ok(())
    }
}
