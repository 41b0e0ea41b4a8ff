//! Credential lookup with provenance.
//!
//! Resolution order:
//! 1. Environment variable
//! 2. Config file (with warning, see [`discovery`](crate::discovery))

use std::fmt;

/// Result of credential resolution with provenance.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value.
    pub value: String,
    /// Where the secret was found.
    pub source: SecretSource,
}

impl fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file (plaintext, not recommended).
    ConfigFile,
}

impl fmt::Display for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {}", var),
            SecretSource::ConfigFile => write!(f, "config file (plaintext)"),
        }
    }
}

/// The four credential slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSlot {
    SessionToken,
    SessionCookie,
    UserToken,
    BotToken,
}

impl CredentialSlot {
    pub const ALL: [CredentialSlot; 4] = [
        CredentialSlot::SessionToken,
        CredentialSlot::SessionCookie,
        CredentialSlot::UserToken,
        CredentialSlot::BotToken,
    ];

    /// Environment variable that fills this slot.
    pub fn env_var(&self) -> &'static str {
        match self {
            CredentialSlot::SessionToken => "SLACKLINE_XOXC_TOKEN",
            CredentialSlot::SessionCookie => "SLACKLINE_XOXD_TOKEN",
            CredentialSlot::UserToken => "SLACKLINE_XOXP_TOKEN",
            CredentialSlot::BotToken => "SLACKLINE_XOXB_TOKEN",
        }
    }

    /// Key under `[credentials]`.
    pub fn config_key(&self) -> &'static str {
        match self {
            CredentialSlot::SessionToken => "session_token",
            CredentialSlot::SessionCookie => "session_cookie",
            CredentialSlot::UserToken => "user_token",
            CredentialSlot::BotToken => "bot_token",
        }
    }
}

/// Resolve one credential slot.
///
/// `env` looks up an environment variable; pass `|k| std::env::var(k).ok()`
/// in production and a map lookup in tests. Empty values count as unset.
pub fn resolve_credential(
    slot: CredentialSlot,
    config_value: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<ResolvedSecret> {
    let var = slot.env_var();
    if let Some(value) = env(var)
        && !value.trim().is_empty()
    {
        return Some(ResolvedSecret {
            value,
            source: SecretSource::EnvVar(var.to_string()),
        });
    }

    config_value
        .filter(|v| !v.trim().is_empty())
        .map(|v| ResolvedSecret {
            value: v.to_string(),
            source: SecretSource::ConfigFile,
        })
}
