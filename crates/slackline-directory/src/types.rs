//! Directory domain types.

use serde::{Deserialize, Serialize};
use slackline_client::{AuthTestResponse, ConversationType};

/// Enumeration protocol used for conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Per-seat cursor-paginated listing.
    Standard,
    /// Organization-wide single-response listing (enterprise grids).
    Enterprise,
}

/// The authenticated principal, fixed once the session boots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Workspace URL; the enterprise surface is reached through it.
    pub url: String,
    pub team: String,
    pub user: String,
    pub team_id: String,
    pub user_id: String,
    /// Present when the workspace belongs to an enterprise grid.
    pub enterprise_id: Option<String>,
    /// Present for bot credentials.
    pub bot_id: Option<String>,
}

impl Identity {
    /// Which conversation enumeration protocol applies.
    pub fn protocol(&self) -> Protocol {
        if self.enterprise_id.is_some() {
            Protocol::Enterprise
        } else {
            Protocol::Standard
        }
    }
}

impl From<AuthTestResponse> for Identity {
    fn from(res: AuthTestResponse) -> Self {
        Self {
            url: res.url,
            team: res.team,
            user: res.user,
            team_id: res.team_id,
            user_id: res.user_id,
            enterprise_id: res.enterprise_id.filter(|id| !id.is_empty()),
            bot_id: res.bot_id.filter(|id| !id.is_empty()),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) on {} ({})", self.user, self.user_id, self.team, self.team_id)?;
        if let Some(grid) = &self.enterprise_id {
            write!(f, " in grid {}", grid)?;
        }
        Ok(())
    }
}

/// Mutually exclusive conversation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationKind {
    DirectMessage,
    GroupDirectMessage,
    Channel,
}

/// A cached conversation with its derived name and purpose.
///
/// Snapshots written with the short keys (`im`, `mpim`, `private`,
/// `memberCount`) load through the aliases.
///
/// `name`, `purpose`, `topic` and `member_count` are outputs of
/// [`derive_conversation`](crate::derive_conversation); they are recomputed
/// whenever the user directory they depend on may have changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// `#channel`, `@username` or `@mpdm-...`.
    pub name: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default, alias = "memberCount")]
    pub member_count: u32,
    #[serde(default, alias = "mpim")]
    pub is_mpim: bool,
    #[serde(default, alias = "im")]
    pub is_im: bool,
    #[serde(default, alias = "private")]
    pub is_private: bool,
    /// Peer user ID (direct messages only).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// Member IDs (group direct messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

impl Conversation {
    /// Category of this conversation.
    pub fn kind(&self) -> ConversationKind {
        if self.is_im {
            ConversationKind::DirectMessage
        } else if self.is_mpim {
            ConversationKind::GroupDirectMessage
        } else {
            ConversationKind::Channel
        }
    }

    /// Whether this conversation falls under a `conversations.list` type.
    ///
    /// Privacy is orthogonal to category: a private group DM matches both
    /// `mpim` and `private_channel`.
    pub fn matches_type(&self, ty: ConversationType) -> bool {
        match ty {
            ConversationType::PublicChannel => !self.is_private,
            ConversationType::PrivateChannel => self.is_private,
            ConversationType::Im => self.is_im,
            ConversationType::Mpim => self.is_mpim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_protocol() {
        let mut identity = Identity::from(AuthTestResponse {
            team_id: "T1".into(),
            user_id: "U1".into(),
            enterprise_id: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(identity.enterprise_id, None);
        assert_eq!(identity.protocol(), Protocol::Standard);

        identity.enterprise_id = Some("E1".into());
        assert_eq!(identity.protocol(), Protocol::Enterprise);
        assert!(identity.to_string().contains("grid E1"));
    }

    #[test]
    fn test_conversation_kind() {
        let dm = Conversation {
            is_im: true,
            is_private: true,
            ..Default::default()
        };
        assert_eq!(dm.kind(), ConversationKind::DirectMessage);
        assert!(dm.matches_type(ConversationType::Im));
        assert!(dm.matches_type(ConversationType::PrivateChannel));
        assert!(!dm.matches_type(ConversationType::PublicChannel));

        let channel = Conversation::default();
        assert_eq!(channel.kind(), ConversationKind::Channel);
        assert!(channel.matches_type(ConversationType::PublicChannel));
    }

    #[test]
    fn test_short_key_records_load() {
        let records: Vec<Conversation> = serde_json::from_str(
            r#"[
                {"id": "D1", "name": "@U1", "memberCount": 2, "im": true, "private": true, "user": "U1"},
                {"id": "G1", "name": "@mpdm-a--b-1", "mpim": true, "private": true, "members": ["U1", "U2"]}
            ]"#,
        )
        .unwrap();

        assert_eq!(records[0].kind(), ConversationKind::DirectMessage);
        assert_eq!(records[0].member_count, 2);
        assert!(records[0].is_private);
        assert_eq!(records[1].kind(), ConversationKind::GroupDirectMessage);

        // Written back with the long keys.
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["is_im"], true);
        assert_eq!(json["member_count"], 2);
    }
}
