//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [credentials]   # session_token, session_cookie, user_token, bot_token
//! [cache]         # users_path, conversations_path
//! [http]          # proxy, ca_cert, ca_insecure, user_agent, api_url
//! [fetch]         # pages_per_minute, burst
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
///
/// Every field is optional so that partial layers (e.g. a project-local
/// override) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlacklineConfig {
    pub credentials: CredentialsSection,
    pub cache: CacheSection,
    pub http: HttpSection,
    pub fetch: FetchSection,
}

impl SlacklineConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Merge another config on top of this one (other takes priority, field by field).
    pub fn merge(&mut self, other: SlacklineConfig) {
        self.credentials.merge(other.credentials);
        self.cache.merge(other.cache);
        self.http.merge(other.http);
        self.fetch.merge(other.fetch);
    }
}

fn overlay<T>(base: &mut Option<T>, top: Option<T>) {
    if top.is_some() {
        *base = top;
    }
}

/// `[credentials]`: the four credential slots.
///
/// Storing credentials here works but is discouraged; prefer the
/// `SLACKLINE_XOX*_TOKEN` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsSection {
    /// Browser session token (`xoxc-`).
    pub session_token: Option<String>,
    /// Browser session cookie `d` (`xoxd-`).
    pub session_cookie: Option<String>,
    /// User OAuth token (`xoxp-`).
    pub user_token: Option<String>,
    /// Bot token (`xoxb-`).
    pub bot_token: Option<String>,
}

impl CredentialsSection {
    fn merge(&mut self, other: CredentialsSection) {
        overlay(&mut self.session_token, other.session_token);
        overlay(&mut self.session_cookie, other.session_cookie);
        overlay(&mut self.user_token, other.user_token);
        overlay(&mut self.bot_token, other.bot_token);
    }

    /// Names of the slots holding a non-empty value.
    pub fn plaintext_slots(&self) -> Vec<&'static str> {
        [
            ("session_token", &self.session_token),
            ("session_cookie", &self.session_cookie),
            ("user_token", &self.user_token),
            ("bot_token", &self.bot_token),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().is_some_and(|v| !v.is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}

/// `[cache]`: snapshot file locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub users_path: Option<PathBuf>,
    pub conversations_path: Option<PathBuf>,
}

impl CacheSection {
    fn merge(&mut self, other: CacheSection) {
        overlay(&mut self.users_path, other.users_path);
        overlay(&mut self.conversations_path, other.conversations_path);
    }
}

/// `[http]`: outbound connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub proxy: Option<String>,
    /// PEM file with an extra trust root.
    pub ca_cert: Option<PathBuf>,
    /// Disable certificate verification. Cannot be combined with `ca_cert`.
    pub ca_insecure: Option<bool>,
    pub user_agent: Option<String>,
    /// Base URL of the API, e.g. for a recording proxy.
    pub api_url: Option<String>,
}

impl HttpSection {
    fn merge(&mut self, other: HttpSection) {
        overlay(&mut self.proxy, other.proxy);
        overlay(&mut self.ca_cert, other.ca_cert);
        overlay(&mut self.ca_insecure, other.ca_insecure);
        overlay(&mut self.user_agent, other.user_agent);
        overlay(&mut self.api_url, other.api_url);
    }
}

/// `[fetch]`: enumeration pacing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    pub pages_per_minute: Option<u32>,
    pub burst: Option<u32>,
}

impl FetchSection {
    fn merge(&mut self, other: FetchSection) {
        overlay(&mut self.pages_per_minute, other.pages_per_minute);
        overlay(&mut self.burst, other.burst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let config = SlacklineConfig::from_toml(
            r#"
[credentials]
user_token = "xoxp-1"

[cache]
users_path = "/tmp/users.json"

[http]
proxy = "http://proxy:3128"
ca_insecure = false

[fetch]
pages_per_minute = 40
burst = 5
"#,
        )
        .unwrap();

        assert_eq!(config.credentials.user_token.as_deref(), Some("xoxp-1"));
        assert_eq!(config.cache.users_path, Some(PathBuf::from("/tmp/users.json")));
        assert_eq!(config.http.proxy.as_deref(), Some("http://proxy:3128"));
        assert_eq!(config.http.ca_insecure, Some(false));
        assert_eq!(config.fetch.pages_per_minute, Some(40));
        assert_eq!(config.fetch.burst, Some(5));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(SlacklineConfig::from_toml("").unwrap(), SlacklineConfig::new());
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let err = SlacklineConfig::from_toml("[fetch]\nburst = \"many\"").unwrap_err();
        assert!(matches!(err, crate::ConfigError::Parse(_)));
    }

    #[test]
    fn test_merge_is_field_level() {
        let mut base = SlacklineConfig::from_toml(
            r#"
[credentials]
bot_token = "xoxb-base"
user_token = "xoxp-base"

[http]
user_agent = "base-agent"
"#,
        )
        .unwrap();
        let top = SlacklineConfig::from_toml(
            r#"
[credentials]
user_token = "xoxp-top"
"#,
        )
        .unwrap();

        base.merge(top);

        assert_eq!(base.credentials.user_token.as_deref(), Some("xoxp-top"));
        assert_eq!(base.credentials.bot_token.as_deref(), Some("xoxb-base"));
        assert_eq!(base.http.user_agent.as_deref(), Some("base-agent"));
    }

    #[test]
    fn test_plaintext_slots() {
        let section = CredentialsSection {
            session_token: Some("xoxc-1".into()),
            session_cookie: Some(String::new()),
            bot_token: Some("xoxb-1".into()),
            ..Default::default()
        };
        assert_eq!(section.plaintext_slots(), vec!["session_token", "bot_token"]);
    }
}
