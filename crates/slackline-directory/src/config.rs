//! Configuration for the directory provider.

use std::path::PathBuf;
use std::time::Duration;

use crate::credentials::CredentialSlots;
use crate::snapshot::default_cache_dir;

/// Default number of enumeration pages allowed per minute.
pub const DEFAULT_PAGES_PER_MINUTE: u32 = 20;

/// Default number of pages that may be issued back to back.
pub const DEFAULT_BURST: u32 = 3;

/// Default user snapshot file name.
pub const USERS_SNAPSHOT_FILE: &str = "users_cache.json";

/// Default conversation snapshot file name.
pub const CONVERSATIONS_SNAPSHOT_FILE: &str = "channels_cache_v2.json";

/// Outbound HTTP settings.
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    /// Base URL of the standard API surface. `None` uses the public endpoint.
    pub api_url: Option<String>,
    pub proxy: Option<String>,
    /// Extra PEM trust root.
    pub ca_cert: Option<PathBuf>,
    /// Skip TLS verification entirely.
    pub insecure: bool,
    /// `None` uses a desktop-browser user agent.
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

/// Enumeration rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateConfig {
    pub pages_per_minute: u32,
    pub burst: u32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            pages_per_minute: DEFAULT_PAGES_PER_MINUTE,
            burst: DEFAULT_BURST,
        }
    }
}

/// Everything the provider needs, already validated by the caller except for
/// credential shapes.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub credentials: CredentialSlots,
    pub users_snapshot: PathBuf,
    pub conversations_snapshot: PathBuf,
    pub http: HttpSettings,
    pub rate: RateConfig,
}

impl ProviderConfig {
    /// Configuration with default snapshot paths, HTTP settings, and rate.
    pub fn new(credentials: CredentialSlots) -> Self {
        let dir = default_cache_dir();
        Self {
            credentials,
            users_snapshot: dir.join(USERS_SNAPSHOT_FILE),
            conversations_snapshot: dir.join(CONVERSATIONS_SNAPSHOT_FILE),
            http: HttpSettings::default(),
            rate: RateConfig::default(),
        }
    }

    /// Keep both snapshots under `dir` with their default file names.
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.users_snapshot = dir.join(USERS_SNAPSHOT_FILE);
        self.conversations_snapshot = dir.join(CONVERSATIONS_SNAPSHOT_FILE);
        self
    }

    pub fn with_users_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.users_snapshot = path.into();
        self
    }

    pub fn with_conversations_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.conversations_snapshot = path.into();
        self
    }

    pub fn with_http(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }

    /// Point the standard surface at another base URL (tests, proxies).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.http.api_url = Some(url.into());
        self
    }

    pub fn with_rate(mut self, rate: RateConfig) -> Self {
        self.rate = rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::new(CredentialSlots::default());
        assert!(config.users_snapshot.ends_with("users_cache.json"));
        assert!(config.conversations_snapshot.ends_with("channels_cache_v2.json"));
        assert_eq!(config.rate.pages_per_minute, 20);
        assert_eq!(config.rate.burst, 3);
        assert!(!config.http.insecure);
    }

    #[test]
    fn test_builder() {
        let config = ProviderConfig::new(CredentialSlots::bot("xoxb-1"))
            .with_snapshot_dir("/tmp/slk")
            .with_conversations_snapshot("/tmp/other.json")
            .with_api_url("http://localhost:1234/api/")
            .with_rate(RateConfig {
                pages_per_minute: 60,
                burst: 1,
            });

        assert_eq!(config.users_snapshot, PathBuf::from("/tmp/slk/users_cache.json"));
        assert_eq!(config.conversations_snapshot, PathBuf::from("/tmp/other.json"));
        assert_eq!(config.http.api_url.as_deref(), Some("http://localhost:1234/api/"));
        assert_eq!(config.rate.burst, 1);
    }
}
