//! Enumeration backends.
//!
//! Both protocols expose the same two paged listings. The fetcher drives
//! either one without knowing which it has; the choice is made once, when the
//! session boots.

use async_trait::async_trait;
use tracing::debug;

use slackline_client::{ListConversationsQuery, Page, RawConversation, SlackClient, User};

use crate::types::Protocol;

/// The capability a fetcher needs from the remote directory.
#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    /// Which protocol this backend speaks.
    fn protocol(&self) -> Protocol;

    /// Fetch one page of users. `None` starts from the beginning.
    async fn users_page(&self, cursor: Option<&str>) -> slackline_client::Result<Page<User>>;

    /// Fetch one page of conversations. `None` starts from the beginning.
    async fn conversations_page(
        &self,
        cursor: Option<&str>,
    ) -> slackline_client::Result<Page<RawConversation>>;
}

/// Cursor-paginated per-workspace listing.
#[derive(Debug, Clone)]
pub struct StandardBackend {
    client: SlackClient,
}

impl StandardBackend {
    pub fn new(client: SlackClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectoryBackend for StandardBackend {
    fn protocol(&self) -> Protocol {
        Protocol::Standard
    }

    async fn users_page(&self, cursor: Option<&str>) -> slackline_client::Result<Page<User>> {
        self.client.users().list(cursor).await
    }

    async fn conversations_page(
        &self,
        cursor: Option<&str>,
    ) -> slackline_client::Result<Page<RawConversation>> {
        let query = ListConversationsQuery::default().with_cursor(cursor.map(str::to_string));
        self.client.conversations().list(&query).await
    }
}

/// Organization-wide listing for enterprise grids.
///
/// Users still come from the generic client; conversations come from the
/// workspace edge endpoint in one unpaginated response.
#[derive(Debug, Clone)]
pub struct EnterpriseBackend {
    generic: SlackClient,
    enterprise: SlackClient,
}

impl EnterpriseBackend {
    pub fn new(generic: SlackClient, enterprise: SlackClient) -> Self {
        Self { generic, enterprise }
    }
}

#[async_trait]
impl DirectoryBackend for EnterpriseBackend {
    fn protocol(&self) -> Protocol {
        Protocol::Enterprise
    }

    async fn users_page(&self, cursor: Option<&str>) -> slackline_client::Result<Page<User>> {
        self.generic.users().list(cursor).await
    }

    async fn conversations_page(
        &self,
        _cursor: Option<&str>,
    ) -> slackline_client::Result<Page<RawConversation>> {
        let all = self.enterprise.edge().conversations().await?;
        let total = all.len();
        // The edge endpoint ignores the archived filter.
        let live: Vec<RawConversation> = all.into_iter().filter(|c| !c.is_archived).collect();
        debug!(total, archived = total - live.len(), "Filtered enterprise conversations");
        Ok(Page::last(live))
    }
}
