//! HTTP client for the content API's services endpoint.
//!
//! Wraps `reqwest` with typed error handling, optional bearer-token auth, and
//! retry with exponential backoff on transient failures. The client returns
//! raw, loosely-typed records; shaping them into the canonical model is the
//! job of [`crate::normalize`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use velora_core::AppConfig;

use crate::error::ContentError;
use crate::retry::retry_with_backoff;
use crate::types::extract_records;

const SERVICES_PATH: &str = "api/services";

/// Client for the content API.
///
/// Use [`ContentClient::from_config`] in binaries; [`ContentClient::new`]
/// takes an explicit base URL so tests can point at a mock server.
#[derive(Debug)]
pub struct ContentClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl ContentClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ContentError::InvalidBaseUrl`] if the
    /// configured content API URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ContentError> {
        Self::new(
            &config.content_api_url,
            config.content_api_token.as_deref(),
            config.content_timeout_secs,
            &config.content_user_agent,
            config.content_max_retries,
            config.content_backoff_base_secs,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors (429, network errors). Set to `0` to
    /// disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ContentError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL base.
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // `Url::join` appends the endpoint path instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ContentError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token: token.map(ToOwned::to_owned),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches the full published service list as raw records.
    ///
    /// Accepts both the enveloped (`{"data": [...]}`) and bare-array payload
    /// shapes.
    ///
    /// # Errors
    ///
    /// - [`ContentError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ContentError::NotFound`] — HTTP 404 (not retried).
    /// - [`ContentError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ContentError::Http`] — network or TLS failure after all retries.
    /// - [`ContentError::Deserialize`] — response body is not valid JSON.
    pub async fn fetch_services(&self) -> Result<Vec<Value>, ContentError> {
        let url = self.services_url(&[("populate", "*")])?;
        let body = self.request_json(&url, "services list").await?;
        Ok(extract_records(&body).to_vec())
    }

    /// Fetches a single service by slug, or `None` when the content source
    /// has no record with that slug.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ContentClient::fetch_services`].
    pub async fn fetch_service_by_slug(&self, slug: &str) -> Result<Option<Value>, ContentError> {
        let url = self.services_url(&[("populate", "*"), ("filters[slug][$eq]", slug)])?;
        let body = self
            .request_json(&url, &format!("service by slug '{slug}'"))
            .await?;
        Ok(extract_records(&body).first().cloned())
    }

    fn services_url(&self, params: &[(&str, &str)]) -> Result<String, ContentError> {
        let mut url =
            self.base_url
                .join(SERVICES_PATH)
                .map_err(|e| ContentError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;

        for (key, value) in params {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url.to_string())
    }

    async fn request_json(&self, url: &str, context: &str) -> Result<Value, ContentError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            let context = context.to_owned();
            async move {
                let mut request = self.client.get(&url);
                if let Some(token) = &self.token {
                    request = request.bearer_auth(token);
                }

                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(30);
                    return Err(ContentError::RateLimited { retry_after_secs });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ContentError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ContentError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<Value>(&body).map_err(|e| ContentError::Deserialize {
                    context,
                    source: e,
                })
            }
        })
        .await
    }
}
