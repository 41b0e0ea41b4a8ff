//! Auth API.

use crate::client::{NO_PARAMS, SlackClient};
use crate::error::Result;
use crate::types::AuthTestResponse;

/// Auth API client.
pub struct AuthApi {
    client: SlackClient,
}

impl AuthApi {
    pub(crate) fn new(client: SlackClient) -> Self {
        Self { client }
    }

    /// Verify the credential and report who it belongs to.
    pub async fn test(&self) -> Result<AuthTestResponse> {
        let mut res: AuthTestResponse = self.client.post("auth.test", NO_PARAMS).await?;
        // Non-grid workspaces report an empty string rather than omitting the field.
        res.enterprise_id = res.enterprise_id.filter(|id| !id.is_empty());
        res.bot_id = res.bot_id.filter(|id| !id.is_empty());
        Ok(res)
    }
}
