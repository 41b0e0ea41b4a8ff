//! Conversations API.

use serde::Serialize;

use crate::client::SlackClient;
use crate::error::Result;
use crate::types::{ConversationType, ConversationsListResponse, Page, RawConversation, ResponseMetadata};

/// Query parameters for `conversations.list`.
#[derive(Debug, Clone)]
pub struct ListConversationsQuery {
    /// Categories to include.
    pub types: Vec<ConversationType>,
    /// Page size.
    pub limit: u32,
    /// Ask the server to drop archived conversations.
    pub exclude_archived: bool,
    /// Continuation cursor from the previous page.
    pub cursor: Option<String>,
}

impl Default for ListConversationsQuery {
    fn default() -> Self {
        Self {
            types: ConversationType::ALL.to_vec(),
            limit: 999,
            exclude_archived: true,
            cursor: None,
        }
    }
}

impl ListConversationsQuery {
    /// Set the continuation cursor.
    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}

#[derive(Serialize)]
struct WireQuery<'a> {
    types: String,
    limit: u32,
    exclude_archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<&'a str>,
}

/// Conversations API client.
pub struct ConversationsApi {
    client: SlackClient,
}

impl ConversationsApi {
    pub(crate) fn new(client: SlackClient) -> Self {
        Self { client }
    }

    /// Fetch one page of conversations.
    pub async fn list(&self, query: &ListConversationsQuery) -> Result<Page<RawConversation>> {
        let wire = WireQuery {
            types: ConversationType::join(&query.types),
            limit: query.limit,
            exclude_archived: query.exclude_archived,
            cursor: query.cursor.as_deref(),
        };
        let res: ConversationsListResponse = self.client.get("conversations.list", &wire).await?;
        Ok(Page {
            items: res.channels,
            next_cursor: ResponseMetadata::cursor(res.response_metadata),
        })
    }
}
