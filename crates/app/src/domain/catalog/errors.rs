//! Catalog errors.

use hamper::products::ProductId;
use thiserror::Error;

use crate::api::{ApiError, RecordError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid product record")]
    Record(#[from] RecordError),
}
