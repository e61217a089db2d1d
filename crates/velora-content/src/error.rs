use thiserror::Error;

/// Errors returned by the content API client.
///
/// Everything here is a transport-layer condition. The normalizer never
/// fails: shape anomalies inside a delivered payload resolve to field
/// defaults instead of surfacing as errors.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the content API after all retries were exhausted.
    #[error("content API rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// HTTP 404 — the content endpoint does not exist (not retried).
    #[error("content endpoint not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx HTTP status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be parsed as JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured content API base URL is not a valid URL base.
    #[error("invalid content API base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
