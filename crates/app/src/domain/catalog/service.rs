//! Catalog service.

use async_trait::async_trait;
use hamper::products::{ProductDetail, ProductId};
use mockall::automock;
use rusty_money::iso::Currency;

use crate::{
    api::{ApiClient, records::ProductRecord},
    domain::catalog::errors::CatalogError,
};

#[derive(Debug, Clone)]
pub struct HttpProductCatalog {
    api: ApiClient,
    currency: &'static Currency,
}

impl HttpProductCatalog {
    #[must_use]
    pub fn new(api: ApiClient, currency: &'static Currency) -> Self {
        Self { api, currency }
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    #[tracing::instrument(
        name = "catalog.service.product_detail",
        skip(self),
        fields(product_id = %id),
        err
    )]
    async fn product_detail(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
        let segment = id.to_string();

        let record: ProductRecord = self
            .api
            .get_json(&["products", &segment])
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        Ok(record.into_detail(self.currency)?)
    }
}

#[automock]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch live pricing for a single product.
    async fn product_detail(&self, id: ProductId) -> Result<ProductDetail, CatalogError>;
}
