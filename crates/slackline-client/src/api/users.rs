//! Users API.

use serde::Serialize;

use crate::client::SlackClient;
use crate::error::Result;
use crate::types::{Page, ResponseMetadata, User, UsersListResponse};

/// Page size requested from `users.list`.
pub const USERS_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Serialize)]
struct ListUsersQuery<'a> {
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<&'a str>,
}

/// Users API client.
pub struct UsersApi {
    client: SlackClient,
}

impl UsersApi {
    pub(crate) fn new(client: SlackClient) -> Self {
        Self { client }
    }

    /// Fetch one page of workspace members.
    pub async fn list(&self, cursor: Option<&str>) -> Result<Page<User>> {
        let query = ListUsersQuery {
            limit: USERS_PAGE_LIMIT,
            cursor,
        };
        let res: UsersListResponse = self.client.get("users.list", &query).await?;
        Ok(Page {
            items: res.members,
            next_cursor: ResponseMetadata::cursor(res.response_metadata),
        })
    }
}
