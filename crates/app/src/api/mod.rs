//! Storefront REST API client.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

pub mod errors;
pub mod records;

pub use errors::{ApiError, RecordError};

/// Configuration for connecting to the storefront API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API base address, e.g. `"https://shop.example/api"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// HTTP client for the storefront API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
}

impl ApiClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|error| ApiError::InvalidBaseUrl(format!("{}: {error}", config.base_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { base_url, http })
    }

    /// Build the URL for a path below the base address. Segments are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry path segments.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// `GET` a JSON resource. A `404` yields `Ok(None)`.
    ///
    /// Bodies may be bare or wrapped in a `{ "data": ... }` envelope.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx status or an unexpected response body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, ApiError> {
        let url = self.url(segments)?;

        debug!(%url, "requesting storefront resource");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(ApiError::UnexpectedResponse(format!(
                "request failed with status {status}: {text}"
            )));
        }

        let body: Envelope<T> = response.json().await?;

        Ok(Some(body.into_inner()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}
