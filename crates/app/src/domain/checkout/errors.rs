//! Checkout errors.

use hamper::enrichment::EnrichmentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("failed to price cart")]
    Pricing(#[from] EnrichmentError),
}
