//! Credential selection.
//!
//! Three credential shapes are supported, chosen in a fixed priority order:
//!
//! 1. Session pair: a `xoxc-` token plus its `d` cookie (`xoxd-`).
//! 2. User token (`xoxp-`).
//! 3. Bot token (`xoxb-`).
//!
//! Values found in the wrong slot are rejected, with one exception kept for
//! compatibility: a bot token in the user-token slot is accepted as a bot
//! credential with a warning.

use std::fmt;

use tracing::{info, warn};

use crate::error::CredentialError;

const SESSION_PREFIX: &str = "xoxc-";
const COOKIE_PREFIX: &str = "xoxd-";
const USER_PREFIX: &str = "xoxp-";
const BOT_PREFIX: &str = "xoxb-";

/// Raw slot values as handed over by the configuration loader.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSlots {
    pub session_token: Option<String>,
    pub session_cookie: Option<String>,
    pub user_token: Option<String>,
    pub bot_token: Option<String>,
}

impl CredentialSlots {
    /// Slots with only a session pair.
    pub fn session(token: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            session_token: Some(token.into()),
            session_cookie: Some(cookie.into()),
            ..Default::default()
        }
    }

    /// Slots with only a user token.
    pub fn user(token: impl Into<String>) -> Self {
        Self {
            user_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Slots with only a bot token.
    pub fn bot(token: impl Into<String>) -> Self {
        Self {
            bot_token: Some(token.into()),
            ..Default::default()
        }
    }
}

impl fmt::Debug for CredentialSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("CredentialSlots")
            .field("session_token", &present(&self.session_token))
            .field("session_cookie", &present(&self.session_cookie))
            .field("user_token", &present(&self.user_token))
            .field("bot_token", &present(&self.bot_token))
            .finish()
    }
}

/// The kind of credential in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Session,
    User,
    Bot,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Session => "session",
            AuthMode::User => "user",
            AuthMode::Bot => "bot",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single credential a session is built from.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Session { token: String, cookie: String },
    User { token: String },
    Bot { token: String },
}

impl Credential {
    pub fn mode(&self) -> AuthMode {
        match self {
            Credential::Session { .. } => AuthMode::Session,
            Credential::User { .. } => AuthMode::User,
            Credential::Bot { .. } => AuthMode::Bot,
        }
    }

    /// Bearer token sent on every request.
    pub fn token(&self) -> &str {
        match self {
            Credential::Session { token, .. }
            | Credential::User { token }
            | Credential::Bot { token } => token,
        }
    }

    /// Session cookie, for session credentials only.
    pub fn cookie(&self) -> Option<&str> {
        match self {
            Credential::Session { cookie, .. } => Some(cookie.as_str()),
            _ => None,
        }
    }

    /// Whether this credential only carries bot-level access.
    pub fn is_bot(&self) -> bool {
        self.mode() == AuthMode::Bot
    }

    /// Message search is unavailable to bot credentials.
    pub fn can_search(&self) -> bool {
        !self.is_bot()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("mode", &self.mode())
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Session,
    Cookie,
    User,
    Bot,
    Unknown,
}

impl Shape {
    fn of(value: &str) -> Self {
        if value.starts_with(SESSION_PREFIX) {
            Shape::Session
        } else if value.starts_with(COOKIE_PREFIX) {
            Shape::Cookie
        } else if value.starts_with(USER_PREFIX) {
            Shape::User
        } else if value.starts_with(BOT_PREFIX) {
            Shape::Bot
        } else {
            Shape::Unknown
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Shape::Session => "session (xoxc-)",
            Shape::Cookie => "session cookie (xoxd-)",
            Shape::User => "user (xoxp-)",
            Shape::Bot => "bot (xoxb-)",
            Shape::Unknown => "unrecognized",
        }
    }
}

fn present(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn wrong_slot(slot: &'static str, found: Shape, hint: &'static str) -> CredentialError {
    CredentialError::WrongSlot {
        slot,
        found: found.describe(),
        hint,
    }
}

/// Pick exactly one credential from the configured slots.
///
/// Every populated slot is checked for misplaced values before anything is
/// selected, so a misconfiguration fails even when a higher-priority
/// credential would have won.
pub fn select_credential(slots: &CredentialSlots) -> Result<Credential, CredentialError> {
    let session_token = present(&slots.session_token);
    let session_cookie = present(&slots.session_cookie);
    let user_token = present(&slots.user_token);
    let bot_token = present(&slots.bot_token);

    if let Some(token) = session_token
        && Shape::of(token) != Shape::Session
    {
        return Err(CredentialError::Malformed {
            slot: "session token",
            expected: SESSION_PREFIX,
        });
    }
    if let Some(cookie) = session_cookie {
        let shape = Shape::of(cookie);
        if matches!(shape, Shape::Session | Shape::User | Shape::Bot) {
            return Err(wrong_slot(
                "session cookie",
                shape,
                "the cookie slot takes the value of the 'd' cookie",
            ));
        }
    }
    if let Some(token) = user_token {
        match Shape::of(token) {
            Shape::Session => {
                return Err(wrong_slot(
                    "user token",
                    Shape::Session,
                    "configure it as the session token together with its cookie",
                ));
            }
            Shape::Cookie => {
                return Err(wrong_slot(
                    "user token",
                    Shape::Cookie,
                    "configure it as the session cookie",
                ));
            }
            _ => {}
        }
    }
    if let Some(token) = bot_token {
        match Shape::of(token) {
            Shape::Session => {
                return Err(wrong_slot(
                    "bot token",
                    Shape::Session,
                    "configure it as the session token together with its cookie",
                ));
            }
            Shape::Cookie => {
                return Err(wrong_slot(
                    "bot token",
                    Shape::Cookie,
                    "configure it as the session cookie",
                ));
            }
            _ => {}
        }
    }

    let credential = match (session_token, session_cookie) {
        (Some(token), Some(cookie)) => Some(Credential::Session {
            token: token.to_string(),
            cookie: cookie.to_string(),
        }),
        (Some(_), None) | (None, Some(_)) => {
            warn!("Only half of the session credential pair is set; ignoring it");
            None
        }
        (None, None) => None,
    };

    let credential = credential
        .or_else(|| {
            user_token.map(|token| {
                if Shape::of(token) == Shape::Bot {
                    warn!("Bot token found in the user token slot; continuing with bot-level access");
                    Credential::Bot {
                        token: token.to_string(),
                    }
                } else {
                    Credential::User {
                        token: token.to_string(),
                    }
                }
            })
        })
        .or_else(|| {
            bot_token.map(|token| {
                if Shape::of(token) == Shape::User {
                    warn!("User token found in the bot token slot; move it to the user token slot for full access");
                }
                Credential::Bot {
                    token: token.to_string(),
                }
            })
        });

    match credential {
        Some(credential) => {
            info!(mode = %credential.mode(), "Selected credential");
            Ok(credential)
        }
        None => match (session_token, session_cookie) {
            (Some(_), None) => Err(CredentialError::IncompleteSession { missing: "cookie" }),
            (None, Some(_)) => Err(CredentialError::IncompleteSession { missing: "token" }),
            _ => Err(CredentialError::Missing),
        },
    }
}
