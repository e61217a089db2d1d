//! In-memory content snapshot shared by the request handlers.
//!
//! The server holds one fully-normalized snapshot at a time. A fetch failure
//! never clears an existing snapshot — stale content beats no content for a
//! marketing site — and until the first successful fetch the content routes
//! answer "content unavailable".

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use velora_content::{normalize_services, ContentClient, ContentError};
use velora_core::{group_by_first_letter, Service, ServiceGroup};

/// One immutable, fully-normalized view of the published content.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub services: Arc<Vec<Service>>,
    pub groups: Arc<Vec<ServiceGroup>>,
    pub fetched_at: DateTime<Utc>,
}

/// Shared handle to the current snapshot, if any.
#[derive(Clone, Default)]
pub struct ContentState {
    inner: Arc<RwLock<Option<Snapshot>>>,
}

impl ContentState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, or `None` before the first successful fetch.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.inner.read().await.clone()
    }

    /// Installs a freshly-normalized service batch as the current snapshot.
    pub async fn install(&self, services: Vec<Service>) {
        let groups = group_by_first_letter(services.clone());
        let snapshot = Snapshot {
            services: Arc::new(services),
            groups: Arc::new(groups),
            fetched_at: Utc::now(),
        };
        *self.inner.write().await = Some(snapshot);
    }

    /// Fetches, normalizes, and installs the current service list.
    ///
    /// Returns the number of services in the new snapshot. On error the
    /// previous snapshot (if any) stays installed.
    ///
    /// # Errors
    ///
    /// Propagates any [`ContentError`] from the transport layer.
    pub async fn refresh(&self, client: &ContentClient) -> Result<usize, ContentError> {
        let records = client.fetch_services().await?;
        let services = normalize_services(&records);
        let count = services.len();
        self.install(services).await;
        Ok(count)
    }
}

/// Periodically re-fetches content, keeping the previous snapshot on failure.
///
/// Runs until the process exits; spawned as a background task at startup.
pub async fn run_refresh_loop(state: ContentState, client: Arc<ContentClient>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    // The first tick fires immediately; startup already fetched, so skip it.
    interval.tick().await;

    loop {
        interval.tick().await;
        match state.refresh(&client).await {
            Ok(count) => {
                tracing::info!(services = count, "content snapshot refreshed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "content refresh failed; keeping previous snapshot");
            }
        }
    }
}
