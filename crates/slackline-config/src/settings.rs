//! Final settings: merged file config plus environment overrides.
//!
//! # Environment Variables
//!
//! - `SLACKLINE_XOXC_TOKEN`, `SLACKLINE_XOXD_TOKEN`: session token and cookie
//! - `SLACKLINE_XOXP_TOKEN`: user token
//! - `SLACKLINE_XOXB_TOKEN`: bot token
//! - `SLACKLINE_USERS_CACHE`, `SLACKLINE_CHANNELS_CACHE`: snapshot paths
//! - `SLACKLINE_PROXY`: outbound proxy URL
//! - `SLACKLINE_SERVER_CA`: extra PEM trust root
//! - `SLACKLINE_SERVER_CA_INSECURE`: disable certificate verification
//! - `SLACKLINE_USER_AGENT`: user agent override

use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::secrets::{CredentialSlot, ResolvedSecret, resolve_credential};
use crate::types::SlacklineConfig;

const USERS_CACHE_ENV: &str = "SLACKLINE_USERS_CACHE";
const CHANNELS_CACHE_ENV: &str = "SLACKLINE_CHANNELS_CACHE";
const PROXY_ENV: &str = "SLACKLINE_PROXY";
const SERVER_CA_ENV: &str = "SLACKLINE_SERVER_CA";
const SERVER_CA_INSECURE_ENV: &str = "SLACKLINE_SERVER_CA_INSECURE";
const USER_AGENT_ENV: &str = "SLACKLINE_USER_AGENT";

/// Credential slots after env/file resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub session_token: Option<ResolvedSecret>,
    pub session_cookie: Option<ResolvedSecret>,
    pub user_token: Option<ResolvedSecret>,
    pub bot_token: Option<ResolvedSecret>,
}

impl ResolvedCredentials {
    pub fn get(&self, slot: CredentialSlot) -> Option<&ResolvedSecret> {
        match slot {
            CredentialSlot::SessionToken => self.session_token.as_ref(),
            CredentialSlot::SessionCookie => self.session_cookie.as_ref(),
            CredentialSlot::UserToken => self.user_token.as_ref(),
            CredentialSlot::BotToken => self.bot_token.as_ref(),
        }
    }

    /// The raw value in a slot.
    pub fn value(&self, slot: CredentialSlot) -> Option<String> {
        self.get(slot).map(|s| s.value.clone())
    }

    pub fn is_empty(&self) -> bool {
        CredentialSlot::ALL.iter().all(|s| self.get(*s).is_none())
    }
}

/// Everything the process needs, resolved once at startup.
///
/// `None` means "use the built-in default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub credentials: ResolvedCredentials,
    pub users_cache: Option<PathBuf>,
    pub conversations_cache: Option<PathBuf>,
    pub proxy: Option<String>,
    pub ca_cert: Option<PathBuf>,
    pub ca_insecure: bool,
    pub user_agent: Option<String>,
    pub api_url: Option<String>,
    pub pages_per_minute: Option<u32>,
    pub burst: Option<u32>,
}

impl Settings {
    /// Resolve against the process environment.
    pub fn from_env(config: &SlacklineConfig) -> Result<Self> {
        Self::resolve(config, |k| std::env::var(k).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve(config: &SlacklineConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let creds = &config.credentials;

        let credentials = ResolvedCredentials {
            session_token: resolve_credential(
                CredentialSlot::SessionToken,
                creds.session_token.as_deref(),
                &env,
            ),
            session_cookie: resolve_credential(
                CredentialSlot::SessionCookie,
                creds.session_cookie.as_deref(),
                &env,
            ),
            user_token: resolve_credential(CredentialSlot::UserToken, creds.user_token.as_deref(), &env),
            bot_token: resolve_credential(CredentialSlot::BotToken, creds.bot_token.as_deref(), &env),
        };

        let ca_insecure = match var(SERVER_CA_INSECURE_ENV) {
            Some(raw) => parse_bool(SERVER_CA_INSECURE_ENV, &raw)?,
            None => config.http.ca_insecure.unwrap_or(false),
        };

        let settings = Settings {
            credentials,
            users_cache: var(USERS_CACHE_ENV)
                .map(PathBuf::from)
                .or_else(|| config.cache.users_path.clone()),
            conversations_cache: var(CHANNELS_CACHE_ENV)
                .map(PathBuf::from)
                .or_else(|| config.cache.conversations_path.clone()),
            proxy: var(PROXY_ENV).or_else(|| config.http.proxy.clone()),
            ca_cert: var(SERVER_CA_ENV)
                .map(PathBuf::from)
                .or_else(|| config.http.ca_cert.clone()),
            ca_insecure,
            user_agent: var(USER_AGENT_ENV).or_else(|| config.http.user_agent.clone()),
            api_url: config.http.api_url.clone(),
            pages_per_minute: config.fetch.pages_per_minute,
            burst: config.fetch.burst,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.ca_insecure && self.ca_cert.is_some() {
            return Err(ConfigError::InvalidValue {
                key: SERVER_CA_INSECURE_ENV.to_string(),
                reason: format!("cannot be combined with {}", SERVER_CA_ENV),
            });
        }
        for (key, value) in [
            ("fetch.pages_per_minute", self.pages_per_minute),
            ("fetch.burst", self.burst),
        ] {
            if value == Some(0) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretSource;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_env_overrides_file() {
        let config = SlacklineConfig::from_toml(
            r#"
[credentials]
user_token = "xoxp-file"
bot_token = "xoxb-file"

[cache]
users_path = "/file/users.json"

[http]
proxy = "http://file-proxy:1"
user_agent = "file-agent"
"#,
        )
        .unwrap();

        let settings = Settings::resolve(
            &config,
            env(&[
                ("SLACKLINE_XOXP_TOKEN", "xoxp-env"),
                ("SLACKLINE_USERS_CACHE", "/env/users.json"),
                ("SLACKLINE_PROXY", "http://env-proxy:2"),
            ]),
        )
        .unwrap();

        let user = settings.credentials.user_token.as_ref().unwrap();
        assert_eq!(user.value, "xoxp-env");
        assert!(matches!(user.source, SecretSource::EnvVar(_)));
        assert_eq!(
            settings.credentials.bot_token.as_ref().unwrap().source,
            SecretSource::ConfigFile
        );
        assert_eq!(settings.users_cache, Some(PathBuf::from("/env/users.json")));
        assert_eq!(settings.proxy.as_deref(), Some("http://env-proxy:2"));
        assert_eq!(settings.user_agent.as_deref(), Some("file-agent"));
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = Settings::resolve(&SlacklineConfig::new(), env(&[])).unwrap();
        assert!(settings.credentials.is_empty());
        assert!(settings.users_cache.is_none());
        assert!(!settings.ca_insecure);
    }

    #[test]
    fn test_ca_and_insecure_conflict() {
        let err = Settings::resolve(
            &SlacklineConfig::new(),
            env(&[
                ("SLACKLINE_SERVER_CA", "/etc/ca.pem"),
                ("SLACKLINE_SERVER_CA_INSECURE", "true"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_insecure_parse() {
        let settings = Settings::resolve(
            &SlacklineConfig::new(),
            env(&[("SLACKLINE_SERVER_CA_INSECURE", "Yes")]),
        )
        .unwrap();
        assert!(settings.ca_insecure);

        let err = Settings::resolve(
            &SlacklineConfig::new(),
            env(&[("SLACKLINE_SERVER_CA_INSECURE", "maybe")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_zero_rate_rejected() {
        let config = SlacklineConfig::from_toml("[fetch]\npages_per_minute = 0").unwrap();
        assert!(Settings::resolve(&config, env(&[])).is_err());
    }
}
