//! Combo API client.
//!
//! Plain JSON over HTTP. Every response body wraps its payload in
//! `{"data": ...}`.
//!
//! # Endpoints
//!
//! - `GET /products` - catalog
//! - `GET /combos` - persisted combos
//! - `POST /combos` - create or overwrite a combo (upsert by `combo_id`)
//! - `DELETE /combos/{id}` - delete a combo
//! - `POST /suggest-combo` - suggested combos for an optional filter object

mod combos;
mod conversions;
mod products;
mod suggestions;
pub mod types;

pub use conversions::ConversionError;
pub use types::SuggestionFilter;

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;
use types::Envelope;

/// Errors that can occur when talking to the combo API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API. Requests are never retried automatically.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unauthorized (missing or rejected token).
    #[error("Unauthorized: check COMBO_API_TOKEN")]
    Unauthorized,

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Combo API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ComboApiClient {
    inner: Arc<ComboApiClientInner>,
}

struct ComboApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ComboApiClient {
    /// Create a new combo API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ComboApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL below the base URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute a GET request and unwrap the `data` envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request with a JSON body and unwrap the `data` envelope.
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request. Any 2xx status is success; the body is ignored.
    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.endpoint(segments)?;
        let response = self.inner.client.delete(url).send().await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Handle API response and parse the JSON envelope.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if response.status().is_success() {
            return response
                .json::<Envelope<T>>()
                .await
                .map(|envelope| envelope.data)
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse error response from the combo API.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let path = response.url().path().to_string();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return ApiError::RateLimited(retry_after);
        }

        if status == 401 || status == 403 {
            return ApiError::Unauthorized;
        }

        if status == 404 {
            return ApiError::NotFound(path);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        ApiError::Api { status, message }
    }
}

impl std::fmt::Debug for ComboApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComboApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ComboApiClient {
        ComboApiClient::new(&ApiConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_below_base_path() {
        let client = client("https://example.com/api");
        assert_eq!(
            client.endpoint(&["combos"]).unwrap().as_str(),
            "https://example.com/api/combos"
        );
        assert_eq!(
            client.endpoint(&["suggest-combo"]).unwrap().as_str(),
            "https://example.com/api/suggest-combo"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client("https://example.com/api/");
        assert_eq!(
            client.endpoint(&["combos", "a/b c"]).unwrap().as_str(),
            "https://example.com/api/combos/a%2Fb%20c"
        );
    }

    #[test]
    fn test_debug_shows_base_url() {
        let client = client("http://localhost:8080");
        assert!(format!("{client:?}").contains("http://localhost:8080/"));
    }
}
