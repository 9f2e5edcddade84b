//! Product Meta
//!
//! Per-product pricing facts gathered from the catalogue while a cart is on
//! screen. Entries are written once per product and never refreshed; the table
//! version moves forward whenever a batch of new entries lands.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::{
    cart::CartLineItem,
    discounts::{DiscountError, DiscountRate},
    prices::Price,
    products::{ProductDetail, ProductId},
};

/// Pricing facts for one product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductMeta {
    /// Unit price after the product discount
    pub final_price: Price,

    /// Units in stock, when known
    pub stock_quantity: Option<u32>,

    /// Discount rate the final price was derived from
    pub discount_rate: DiscountRate,
}

impl ProductMeta {
    /// Derive meta from a catalogue product detail.
    ///
    /// # Errors
    ///
    /// Returns a `DiscountError` if the discounted price cannot be represented.
    pub fn from_detail(detail: &ProductDetail) -> Result<Self, DiscountError> {
        Ok(Self {
            final_price: detail.final_price()?,
            stock_quantity: detail.stock_quantity,
            discount_rate: detail.discount_rate,
        })
    }
}

/// Outcome of looking a product up in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetaEntry {
    /// The product detail was fetched.
    Resolved(ProductMeta),

    /// The lookup failed; pricing falls back to the cart snapshot.
    Failed,
}

impl MetaEntry {
    /// The resolved meta, if the lookup succeeded.
    pub fn resolved(&self) -> Option<&ProductMeta> {
        match self {
            Self::Resolved(meta) => Some(meta),
            Self::Failed => None,
        }
    }

    /// The live unit price, if it is usable for pricing (resolved and positive).
    pub fn live_price(&self) -> Option<Price> {
        self.resolved()
            .map(|meta| meta.final_price)
            .filter(|price| price.to_minor_units() > 0)
    }
}

/// Append-only table of product meta with a version counter.
#[derive(Debug, Default, Clone)]
pub struct MetaTable {
    entries: FxHashMap<ProductId, MetaEntry>,
    version: u64,
}

impl MetaTable {
    /// An empty table at version zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the entry for a product.
    pub fn get(&self, product: ProductId) -> Option<&MetaEntry> {
        self.entries.get(&product)
    }

    /// Whether the product has been attempted.
    pub fn contains(&self, product: ProductId) -> bool {
        self.entries.contains_key(&product)
    }

    /// Number of attempted products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been attempted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current version; bumped once per committed batch.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Distinct product ids in `items` with no entry yet, in first-seen order.
    pub fn missing(&self, items: &[CartLineItem]) -> SmallVec<[ProductId; 8]> {
        let mut seen = FxHashSet::default();

        items
            .iter()
            .map(|item| item.product_id)
            .filter(|id| !self.contains(*id) && seen.insert(*id))
            .collect()
    }

    /// Store a settled batch of lookups and bump the version.
    ///
    /// The first entry written for a product wins. An empty batch leaves the
    /// version untouched. Returns the version after the commit.
    pub fn commit(&mut self, batch: impl IntoIterator<Item = (ProductId, MetaEntry)>) -> u64 {
        let mut committed = false;

        for (product, entry) in batch {
            self.entries.entry(product).or_insert(entry);
            committed = true;
        }

        if committed {
            self.version += 1;
        }

        self.version
    }
}
