//! Carts service.

use std::path::PathBuf;

use async_trait::async_trait;
use hamper::cart::CartSnapshot;
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::{Span, info};

use crate::{
    api::{ApiClient, records::CartRecord},
    domain::carts::errors::CartSourceError,
};

/// Reads the shopper's cart from the storefront API.
#[derive(Debug, Clone)]
pub struct HttpCartSource {
    api: ApiClient,
    currency: &'static Currency,
}

impl HttpCartSource {
    #[must_use]
    pub fn new(api: ApiClient, currency: &'static Currency) -> Self {
        Self { api, currency }
    }
}

#[async_trait]
impl CartSource for HttpCartSource {
    #[tracing::instrument(
        name = "carts.service.current_cart",
        skip(self),
        fields(line_count = tracing::field::Empty),
        err
    )]
    async fn current_cart(&self) -> Result<CartSnapshot, CartSourceError> {
        let record: CartRecord = self.api.get_json(&["cart"]).await?.unwrap_or_default();

        let cart = record.into_snapshot(self.currency)?;

        Span::current().record("line_count", cart.len());

        Ok(cart)
    }
}

/// Reads a cart exported as JSON, in the same shape as the API's `GET /cart` body.
#[derive(Debug, Clone)]
pub struct FileCartSource {
    path: PathBuf,
    currency: &'static Currency,
}

impl FileCartSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, currency: &'static Currency) -> Self {
        Self {
            path: path.into(),
            currency,
        }
    }
}

#[async_trait]
impl CartSource for FileCartSource {
    #[tracing::instrument(
        name = "carts.service.file_cart",
        skip(self),
        fields(path = %self.path.display()),
        err
    )]
    async fn current_cart(&self) -> Result<CartSnapshot, CartSourceError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CartSourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        let record: CartRecord = serde_json::from_str(&contents)?;
        let cart = record.into_snapshot(self.currency)?;

        info!(line_count = cart.len(), "loaded cart file");

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartSource: Send + Sync {
    /// The current server-side cart snapshot.
    async fn current_cart(&self) -> Result<CartSnapshot, CartSourceError>;
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rusty_money::{Money, iso::VND};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn file_cart_source_reads_cart_export() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        write!(
            file,
            r#"{{"items":[{{"productId":5,"productName":"Hamper","price":100000,"quantity":3}}]}}"#
        )?;

        let cart = FileCartSource::new(file.path(), VND).current_cart().await?;

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.items().first().map(|item| item.price),
            Some(Money::from_minor(100_000, VND))
        );

        Ok(())
    }

    #[tokio::test]
    async fn missing_cart_file_is_an_io_error() {
        let result = FileCartSource::new("/nonexistent/cart.json", VND)
            .current_cart()
            .await;

        assert!(
            matches!(result, Err(CartSourceError::Io { .. })),
            "expected Io error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn malformed_cart_file_is_a_parse_error() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "{{not json")?;

        let result = FileCartSource::new(file.path(), VND).current_cart().await;

        assert!(
            matches!(result, Err(CartSourceError::Parse(_))),
            "expected Parse error, got {result:?}"
        );

        Ok(())
    }
}
