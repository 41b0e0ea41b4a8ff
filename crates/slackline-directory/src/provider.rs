//! The directory provider facade.
//!
//! Owns the session, the cache and the snapshot store, and sequences
//! refreshes: snapshot first, live fetch on a miss, snapshot write after a
//! successful fetch.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use slackline_client::ConversationType;

use crate::cache::DirectoryCache;
use crate::config::ProviderConfig;
use crate::credentials::{AuthMode, select_credential};
use crate::derive::rederive_conversation;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::resolve::{SearchType, UserResolution, resolve_users};
use crate::session::Session;
use crate::snapshot::SnapshotStore;
use crate::throttle::{PageThrottle, Throttle};
use crate::types::{Conversation, Identity};

/// Workspace directory: who is in it and what conversations it has.
pub struct DirectoryProvider {
    session: Session,
    cache: Arc<DirectoryCache>,
    snapshots: SnapshotStore,
    throttle: Arc<dyn Throttle>,
}

impl std::fmt::Debug for DirectoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryProvider")
            .field("session", &self.session)
            .field("snapshots", &self.snapshots)
            .field("users", &self.cache.user_count())
            .field("conversations", &self.cache.conversation_count())
            .finish_non_exhaustive()
    }
}

impl DirectoryProvider {
    /// Select a credential and prepare the provider.
    ///
    /// Credential problems are reported here, before any network traffic.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let credential = select_credential(&config.credentials)?;
        Ok(Self {
            session: Session::new(credential, config.http),
            cache: Arc::new(DirectoryCache::new()),
            snapshots: SnapshotStore::new(config.users_snapshot, config.conversations_snapshot),
            throttle: Arc::new(PageThrottle::new(config.rate)),
        })
    }

    /// Replace the page throttle.
    pub fn with_throttle(mut self, throttle: Arc<dyn Throttle>) -> Self {
        self.throttle = throttle;
        self
    }

    /// Whether the provider runs with bot-level access only.
    pub fn is_bot_token(&self) -> bool {
        self.session.credential().is_bot()
    }

    pub fn credential_mode(&self) -> AuthMode {
        self.session.credential().mode()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &Arc<DirectoryCache> {
        &self.cache
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// The authenticated identity, booting the session if needed.
    pub async fn identity(&self) -> Result<Identity> {
        self.session.identity().await.cloned()
    }

    // ── Refresh ──────────────────────────────────────────────────────────────

    /// Load users and then conversations, from snapshots when present.
    pub async fn refresh(&self, cancel: &CancellationToken) -> Result<()> {
        self.refresh_users(cancel).await?;
        self.refresh_conversations(cancel).await?;
        Ok(())
    }

    /// Load users from the snapshot, or fetch them if there is none.
    pub async fn refresh_users(&self, cancel: &CancellationToken) -> Result<usize> {
        match self.snapshots.load_users() {
            Ok(Some(users)) => {
                let count = self.cache.merge_users(users);
                info!(count, path = %self.snapshots.users_path().display(), "Loaded users from snapshot");
                return Ok(count);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable user snapshot"),
        }
        self.fetch_users(cancel).await
    }

    /// Load conversations from the snapshot, or fetch them if there is none.
    ///
    /// Direct messages from a snapshot are re-derived against the users
    /// currently cached.
    pub async fn refresh_conversations(&self, cancel: &CancellationToken) -> Result<usize> {
        match self.snapshots.load_conversations() {
            Ok(Some(conversations)) => {
                let users = self.cache.user_map();
                let count = self.cache.merge_conversations(
                    conversations
                        .into_iter()
                        .map(|conv| rederive_conversation(conv, &users)),
                );
                info!(
                    count,
                    path = %self.snapshots.conversations_path().display(),
                    "Loaded conversations from snapshot"
                );
                return Ok(count);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable conversation snapshot"),
        }
        self.fetch_conversations(cancel).await
    }

    /// Fetch every user from the network, then write the user snapshot.
    pub async fn fetch_users(&self, cancel: &CancellationToken) -> Result<usize> {
        let merged = self.fetcher().await?.fetch_users(cancel).await?;
        self.persist_users();
        Ok(merged)
    }

    /// Fetch every conversation from the network, then write the snapshot.
    pub async fn fetch_conversations(&self, cancel: &CancellationToken) -> Result<usize> {
        let merged = self.fetcher().await?.fetch_conversations(cancel).await?;
        self.persist_conversations();
        Ok(merged)
    }

    /// Fetch users and conversations from the network, ignoring snapshots.
    pub async fn fetch_all(&self, cancel: &CancellationToken) -> Result<()> {
        self.fetch_users(cancel).await?;
        self.fetch_conversations(cancel).await?;
        Ok(())
    }

    async fn fetcher(&self) -> Result<Fetcher> {
        let backend = self.session.backend().await?;
        Ok(Fetcher::new(
            backend,
            Arc::clone(&self.throttle),
            Arc::clone(&self.cache),
        ))
    }

    fn persist_users(&self) {
        let path = self.snapshots.users_path();
        match self.snapshots.store_users(&self.cache.user_map()) {
            Ok(count) => info!(count, path = %path.display(), "Wrote user snapshot"),
            Err(e) => warn!(error = %e, "Failed to write user snapshot"),
        }
    }

    fn persist_conversations(&self) {
        let path = self.snapshots.conversations_path();
        let conversations = self.cache.conversations_snapshot().conversations;
        match self.snapshots.store_conversations(&conversations) {
            Ok(count) => info!(count, path = %path.display(), "Wrote conversation snapshot"),
            Err(e) => warn!(error = %e, "Failed to write conversation snapshot"),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// Cached conversations of the given types, grouped in the order the
    /// types are listed. An empty list means every type. Never fetches.
    pub fn conversations_by_type(&self, types: &[ConversationType]) -> Vec<Conversation> {
        let every = ConversationType::ALL;
        let types = if types.is_empty() {
            &every[..]
        } else {
            types
        };

        let mut all: Vec<Conversation> = self
            .cache
            .conversations_snapshot()
            .conversations
            .into_values()
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for ty in types {
            for conv in all.iter().filter(|c| c.matches_type(*ty)) {
                if seen.insert(conv.id.clone()) {
                    out.push(conv.clone());
                }
            }
        }
        out
    }

    /// Search cached users. Never fetches.
    pub fn resolve_users(&self, query: &str, search: SearchType) -> Result<Vec<UserResolution>> {
        resolve_users(&self.cache.user_map(), query, search)
    }
}
