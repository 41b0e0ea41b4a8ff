//! Wire types for the workspace API.
//!
//! Records are decoded permissively: every field the client does not model
//! explicitly is kept in an `extra` map so that snapshots written from these
//! types carry the full remote profile.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

/// Response from `auth.test`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTestResponse {
    /// Workspace URL, e.g. `https://acme.slack.com/`.
    #[serde(default)]
    pub url: String,
    /// Workspace name.
    #[serde(default)]
    pub team: String,
    /// Username of the authenticated principal.
    #[serde(default)]
    pub user: String,
    /// Workspace ID.
    #[serde(default)]
    pub team_id: String,
    /// User ID of the authenticated principal.
    #[serde(default)]
    pub user_id: String,
    /// Enterprise grid ID, present only for grid members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_id: Option<String>,
    /// Bot ID, present only for bot credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// A workspace member as returned by `users.list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable user ID.
    pub id: String,
    /// Username (handle).
    #[serde(default)]
    pub name: String,
    /// Full name.
    #[serde(default)]
    pub real_name: String,
    /// Whether the account is deactivated.
    #[serde(default)]
    pub deleted: bool,
    /// Whether the account is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// Profile block.
    #[serde(default)]
    pub profile: UserProfile,
    /// Remaining fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Profile section of a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name chosen by the user (may be empty).
    #[serde(default)]
    pub display_name: String,
    /// Full name as shown in the profile.
    #[serde(default)]
    pub real_name: String,
    /// Email address (may be hidden by workspace policy).
    #[serde(default)]
    pub email: String,
    /// Remaining profile fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversations
// ─────────────────────────────────────────────────────────────────────────────

/// Conversation categories accepted by `conversations.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationType {
    /// Group direct message.
    Mpim,
    /// Direct message.
    Im,
    /// Public channel.
    PublicChannel,
    /// Private channel.
    PrivateChannel,
}

impl ConversationType {
    /// Every category, in the order the directory enumerates them.
    pub const ALL: [ConversationType; 4] = [
        ConversationType::Mpim,
        ConversationType::Im,
        ConversationType::PublicChannel,
        ConversationType::PrivateChannel,
    ];

    /// Wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationType::Mpim => "mpim",
            ConversationType::Im => "im",
            ConversationType::PublicChannel => "public_channel",
            ConversationType::PrivateChannel => "private_channel",
        }
    }

    /// Comma-joined wire form of a type filter.
    pub fn join(types: &[ConversationType]) -> String {
        types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::fmt::Display for ConversationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConversationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mpim" => Ok(ConversationType::Mpim),
            "im" => Ok(ConversationType::Im),
            "public_channel" => Ok(ConversationType::PublicChannel),
            "private_channel" => Ok(ConversationType::PrivateChannel),
            other => Err(format!(
                "unknown conversation type '{}': expected one of mpim, im, public_channel, private_channel",
                other
            )),
        }
    }
}

/// `{ "value": ... }` wrapper used for topic and purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub value: String,
}

/// A conversation exactly as the remote service reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConversation {
    /// Conversation ID.
    pub id: String,
    /// Raw name (empty for direct messages).
    #[serde(default)]
    pub name: String,
    /// Lower-cased, normalized name.
    #[serde(default)]
    pub name_normalized: String,
    #[serde(default, deserialize_with = "null_default")]
    pub topic: TextValue,
    #[serde(default, deserialize_with = "null_default")]
    pub purpose: TextValue,
    /// Peer user ID (direct messages only).
    #[serde(default)]
    pub user: String,
    /// Member IDs, when the remote includes them.
    #[serde(default, deserialize_with = "null_default")]
    pub members: Vec<String>,
    #[serde(default)]
    pub num_members: u32,
    #[serde(default)]
    pub is_im: bool,
    #[serde(default)]
    pub is_mpim: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_archived: bool,
}

fn null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pagination
// ─────────────────────────────────────────────────────────────────────────────

/// One page of an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Cursor for the next page; `None` once the enumeration is exhausted.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A terminal page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// `response_metadata` block carried by paginated methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

impl ResponseMetadata {
    /// Convert the wire cursor (empty string = done) into an option.
    pub(crate) fn cursor(meta: Option<ResponseMetadata>) -> Option<String> {
        meta.map(|m| m.next_cursor).filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersListResponse {
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationsListResponse {
    #[serde(default)]
    pub channels: Vec<RawConversation>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserBootResponse {
    #[serde(default)]
    pub channels: Vec<RawConversation>,
    #[serde(default)]
    pub ims: Vec<RawConversation>,
}
