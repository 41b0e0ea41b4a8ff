//! Edge API (organization-wide surface).
//!
//! The edge surface lives on the workspace URL rather than the global
//! endpoint, so it must be called through a client produced by
//! [`SlackClient::rebased`].

use crate::client::{NO_PARAMS, SlackClient};
use crate::error::Result;
use crate::types::{RawConversation, UserBootResponse};

/// Edge API client.
pub struct EdgeApi {
    client: SlackClient,
}

impl EdgeApi {
    pub(crate) fn new(client: SlackClient) -> Self {
        Self { client }
    }

    /// Every conversation visible to the caller, in one response.
    ///
    /// Archived conversations are included; the server offers no filter.
    pub async fn conversations(&self) -> Result<Vec<RawConversation>> {
        let res: UserBootResponse = self.client.post("client.userBoot", NO_PARAMS).await?;
        let mut all = res.channels;
        all.extend(res.ims);
        Ok(all)
    }
}
