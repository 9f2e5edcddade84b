//! Storefront API errors.

use hamper::cart::CartError;
use thiserror::Error;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or deserialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base address cannot be used.
    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(String),

    /// The API returned a non-2xx response.
    #[error("unexpected response from storefront API: {0}")]
    UnexpectedResponse(String),
}

/// Errors converting API records into domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A monetary amount was not finite or out of range.
    #[error("invalid amount in field `{0}`")]
    InvalidAmount(&'static str),

    /// Cart lines did not share a currency.
    #[error(transparent)]
    Cart(#[from] CartError),
}
