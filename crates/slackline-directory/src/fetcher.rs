//! Paginated directory fetch.
//!
//! Every page is preceded by one throttle permit. Both the permit wait and
//! the page request race the caller's cancellation token, so a cancelled
//! refresh stops before issuing another request. Pages are merged as they
//! arrive; a failure part way through leaves earlier pages in the cache.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::DirectoryBackend;
use crate::cache::DirectoryCache;
use crate::derive::derive_conversation;
use crate::error::{DirectoryError, Result};
use crate::throttle::Throttle;

/// Drives a backend and merges what it returns into the cache.
pub struct Fetcher {
    backend: Arc<dyn DirectoryBackend>,
    throttle: Arc<dyn Throttle>,
    cache: Arc<DirectoryCache>,
}

impl Fetcher {
    pub fn new(
        backend: Arc<dyn DirectoryBackend>,
        throttle: Arc<dyn Throttle>,
        cache: Arc<DirectoryCache>,
    ) -> Self {
        Self {
            backend,
            throttle,
            cache,
        }
    }

    /// Enumerate every user. Returns the number merged.
    pub async fn fetch_users(&self, cancel: &CancellationToken) -> Result<usize> {
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        let mut merged = 0usize;

        loop {
            self.permit(cancel).await?;
            let page = self
                .guarded(cancel, self.backend.users_page(cursor.as_deref()))
                .await?;
            pages += 1;
            merged += self.cache.merge_users(page.items);
            debug!(page = pages, merged, "Fetched users page");

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(pages, merged, total = self.cache.user_count(), "User enumeration complete");
        Ok(merged)
    }

    /// Enumerate every conversation. Returns the number merged.
    ///
    /// Names are derived against the users cached at the time each page
    /// arrives, so users should be fetched first.
    pub async fn fetch_conversations(&self, cancel: &CancellationToken) -> Result<usize> {
        let protocol = self.backend.protocol();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        let mut merged = 0usize;

        loop {
            self.permit(cancel).await?;
            let page = self
                .guarded(cancel, self.backend.conversations_page(cursor.as_deref()))
                .await?;
            pages += 1;

            let users = self.cache.user_map();
            let derived = page.items.iter().map(|raw| derive_conversation(raw, &users));
            merged += self.cache.merge_conversations(derived);
            debug!(?protocol, page = pages, merged, "Fetched conversations page");

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(
            ?protocol,
            pages,
            merged,
            total = self.cache.conversation_count(),
            "Conversation enumeration complete"
        );
        Ok(merged)
    }

    async fn permit(&self, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DirectoryError::Cancelled),
            _ = self.throttle.acquire() => Ok(()),
        }
    }

    async fn guarded<T>(
        &self,
        cancel: &CancellationToken,
        request: impl Future<Output = slackline_client::Result<T>>,
    ) -> Result<T> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DirectoryError::Cancelled),
            res = request => res.map_err(DirectoryError::Fetch),
        }
    }
}
