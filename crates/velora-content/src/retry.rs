//! Retry utilities for the content API client.
//!
//! Exponential backoff for transient HTTP errors (429, network failures).
//! Non-retriable errors (parse failures, 404s, other non-2xx statuses) are
//! propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ContentError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ContentError::RateLimited`] — HTTP 429; the CMS has asked us to back off.
/// - [`ContentError::Http`] — network-level failure (connection reset, timeout, etc.).
///
/// Non-retriable errors (propagated immediately):
/// - [`ContentError::NotFound`] — 404; retrying would return the same result.
/// - [`ContentError::UnexpectedStatus`] — e.g., 403, 500.
/// - [`ContentError::Deserialize`] — response body does not parse; retrying won't fix it.
/// - [`ContentError::InvalidBaseUrl`] — configuration problem, not transient.
fn is_retriable(err: &ContentError) -> bool {
    matches!(
        err,
        ContentError::RateLimited { .. } | ContentError::Http(_)
    )
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after the
/// first try. If all retries are exhausted the last error is returned.
/// Non-retriable errors are returned immediately without sleeping.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ContentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ContentError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Exponential backoff: base * 2^attempt seconds, saturating so extreme
        // configs cannot overflow.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient content API error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
