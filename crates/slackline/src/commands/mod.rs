//! CLI command handlers.

pub mod channels;
pub mod config;
pub mod refresh;
pub mod users;
pub mod whoami;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use slackline_config::{CredentialSlot, LoadedConfig, Settings};
use slackline_directory::{
    CredentialSlots, DirectoryProvider, HttpSettings, ProviderConfig, RateConfig,
};
use tokio_util::sync::CancellationToken;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Config files that were consulted.
    pub loaded: LoadedConfig,
    /// File config merged with environment overrides.
    pub settings: Settings,
}

impl Context {
    /// Discover config files and resolve settings from the environment.
    pub fn load(json_output: bool, verbose: bool) -> Result<Self> {
        let loaded = slackline_config::load_config(None).context("failed to load configuration")?;
        for warning in &loaded.warnings {
            tracing::warn!("{}", warning);
        }
        let settings =
            Settings::from_env(&loaded.config).context("invalid configuration")?;

        Ok(Self {
            json_output,
            verbose,
            loaded,
            settings,
        })
    }

    /// Build a provider from the resolved settings.
    ///
    /// Fails before any network traffic when no usable credential is set.
    pub fn provider(&self) -> Result<DirectoryProvider> {
        Ok(DirectoryProvider::new(provider_config(&self.settings))?)
    }
}

/// Map flat settings onto the provider's configuration.
pub fn provider_config(settings: &Settings) -> ProviderConfig {
    let creds = &settings.credentials;
    let slots = CredentialSlots {
        session_token: creds.value(CredentialSlot::SessionToken),
        session_cookie: creds.value(CredentialSlot::SessionCookie),
        user_token: creds.value(CredentialSlot::UserToken),
        bot_token: creds.value(CredentialSlot::BotToken),
    };

    let mut config = ProviderConfig::new(slots).with_http(HttpSettings {
        api_url: settings.api_url.clone(),
        proxy: settings.proxy.clone(),
        ca_cert: settings.ca_cert.clone(),
        insecure: settings.ca_insecure,
        user_agent: settings.user_agent.clone(),
        timeout: None,
    });

    let defaults = RateConfig::default();
    config = config.with_rate(RateConfig {
        pages_per_minute: settings.pages_per_minute.unwrap_or(defaults.pages_per_minute),
        burst: settings.burst.unwrap_or(defaults.burst),
    });

    if let Some(path) = &settings.users_cache {
        config = config.with_users_snapshot(path);
    }
    if let Some(path) = &settings.conversations_cache {
        config = config.with_conversations_snapshot(path);
    }
    config
}

/// A token cancelled on Ctrl-C.
///
/// Pages already merged stay in the cache; the in-flight page is dropped.
pub fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current page");
            child.cancel();
        }
    });
    token
}

/// Write rows as CSV (with header) to stdout.
pub fn write_csv<T: serde::Serialize>(rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Path as displayed in human output.
pub fn display_path(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".to_string())
}
