//! Meta cache.

use futures_util::future::join_all;
use hamper::{
    cart::CartLineItem,
    meta::{MetaEntry, MetaTable, ProductMeta},
    products::ProductId,
};
use tokio::sync::watch;
use tracing::{Span, debug, warn};

use crate::domain::catalog::ProductCatalog;

/// Counts from one cache sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Products that had no entry and were fetched
    pub requested: usize,

    /// Fetches that resolved to live data
    pub resolved: usize,

    /// Fetches that failed and fell back to the cart price
    pub failed: usize,

    /// Table version after the sync
    pub version: u64,
}

/// Product meta cache owned by a single cart view.
///
/// Entries are written once per product and never evicted or refreshed.
#[derive(Debug)]
pub struct MetaCache {
    table: MetaTable,
    changes: watch::Sender<u64>,
}

impl Default for MetaCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaCache {
    #[must_use]
    pub fn new() -> Self {
        let table = MetaTable::new();
        let (changes, _) = watch::channel(table.version());

        Self { table, changes }
    }

    /// The cached entries.
    pub fn table(&self) -> &MetaTable {
        &self.table
    }

    /// Current version.
    pub fn version(&self) -> u64 {
        self.table.version()
    }

    /// Receive the table version each time a sync adds entries.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Fetch meta for every product in `items` not yet attempted.
    ///
    /// All missing products are fetched concurrently. Once every fetch has settled the results
    /// are committed together and the version is bumped and published once. Failed fetches are
    /// stored as [`MetaEntry::Failed`] and never retried.
    #[tracing::instrument(
        name = "pricing.meta_cache.sync",
        skip_all,
        fields(
            line_count = items.len(),
            requested = tracing::field::Empty,
            failed = tracing::field::Empty
        )
    )]
    pub async fn sync(
        &mut self,
        catalog: &dyn ProductCatalog,
        items: &[CartLineItem],
    ) -> SyncReport {
        let missing = self.table.missing(items);

        if missing.is_empty() {
            return SyncReport {
                version: self.table.version(),
                ..SyncReport::default()
            };
        }

        let results = join_all(
            missing
                .iter()
                .map(|&product| async move { (product, fetch_entry(catalog, product).await) }),
        )
        .await;

        let failed = results
            .iter()
            .filter(|(_, entry)| matches!(entry, MetaEntry::Failed))
            .count();

        let requested = results.len();
        let version = self.table.commit(results);

        self.changes.send_replace(version);

        let span = Span::current();

        span.record("requested", requested);
        span.record("failed", failed);

        debug!(version, "meta cache updated");

        SyncReport {
            requested,
            resolved: requested - failed,
            failed,
            version,
        }
    }
}

async fn fetch_entry(catalog: &dyn ProductCatalog, product: ProductId) -> MetaEntry {
    let detail = match catalog.product_detail(product).await {
        Ok(detail) => detail,
        Err(error) => {
            warn!(product_id = %product, %error, "product detail unavailable; using cart price");

            return MetaEntry::Failed;
        }
    };

    match ProductMeta::from_detail(&detail) {
        Ok(meta) => MetaEntry::Resolved(meta),
        Err(error) => {
            warn!(product_id = %product, %error, "product price unusable; using cart price");

            MetaEntry::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use hamper::{discounts::DiscountRate, products::ProductDetail};
    use mockall::predicate::eq;
    use rusty_money::{Money, iso::VND};

    use crate::{
        api::ApiError,
        domain::catalog::{CatalogError, MockProductCatalog},
    };

    use super::*;

    fn item(id: u64, price: i64) -> CartLineItem {
        CartLineItem::new(ProductId::new(id), "Lantern", Money::from_minor(price, VND), 1)
    }

    fn detail(id: ProductId, price: i64, rate: f64) -> ProductDetail {
        ProductDetail {
            id,
            price: Money::from_minor(price, VND),
            discount_rate: DiscountRate::from_fraction(rate),
            stock_quantity: Some(3),
        }
    }

    #[tokio::test]
    async fn sync_fetches_each_missing_product_once() {
        let mut catalog = MockProductCatalog::new();

        catalog
            .expect_product_detail()
            .with(eq(ProductId::new(5)))
            .times(1)
            .returning(|id| Ok(detail(id, 100_000, 0.2)));

        catalog
            .expect_product_detail()
            .with(eq(ProductId::new(6)))
            .times(1)
            .returning(|id| Ok(detail(id, 40_000, 0.0)));

        let mut cache = MetaCache::new();
        let items = [item(5, 100_000), item(6, 40_000), item(5, 100_000)];

        let report = cache.sync(&catalog, &items).await;

        assert_eq!(
            report,
            SyncReport {
                requested: 2,
                resolved: 2,
                failed: 0,
                version: 1
            }
        );

        let entry = cache.table().get(ProductId::new(5)).and_then(MetaEntry::resolved);

        assert_eq!(entry.map(|meta| meta.final_price), Some(Money::from_minor(80_000, VND)));

        let again = cache.sync(&catalog, &items).await;

        assert_eq!(again.requested, 0);
        assert_eq!(again.version, 1, "no missing products must not bump the version");
    }

    #[tokio::test]
    async fn failed_fetch_is_recorded_and_not_retried() {
        let mut catalog = MockProductCatalog::new();

        catalog
            .expect_product_detail()
            .times(1)
            .returning(|_| Err(CatalogError::Api(ApiError::UnexpectedResponse("502".to_string()))));

        let mut cache = MetaCache::new();
        let items = [item(9, 50_000)];

        let first = cache.sync(&catalog, &items).await;
        let second = cache.sync(&catalog, &items).await;

        assert_eq!(first.failed, 1);
        assert_eq!(second.requested, 0);
        assert_eq!(cache.table().get(ProductId::new(9)), Some(&MetaEntry::Failed));
    }

    #[tokio::test]
    async fn sync_publishes_new_version() -> testresult::TestResult {
        let mut catalog = MockProductCatalog::new();
        catalog
            .expect_product_detail()
            .returning(|id| Ok(detail(id, 10_000, 0.0)));

        let mut cache = MetaCache::new();
        let mut changes = cache.subscribe();

        cache.sync(&catalog, &[item(1, 10_000)]).await;

        assert!(changes.has_changed()?);
        assert_eq!(*changes.borrow_and_update(), 1);

        cache.sync(&catalog, &[item(1, 10_000), item(2, 10_000)]).await;

        assert_eq!(*changes.borrow_and_update(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn cache_is_append_only_across_item_changes() {
        let mut catalog = MockProductCatalog::new();
        catalog
            .expect_product_detail()
            .times(2)
            .returning(|id| Ok(detail(id, 10_000, 0.0)));

        let mut cache = MetaCache::new();

        cache.sync(&catalog, &[item(1, 10_000)]).await;
        cache.sync(&catalog, &[item(2, 10_000)]).await;

        assert!(cache.table().contains(ProductId::new(1)));
        assert!(cache.table().contains(ProductId::new(2)));
        assert_eq!(cache.version(), 2);
    }
}
