//! Configuration system for slackline.
//!
//! Provides TOML-based configuration with:
//! - Config file layering (platform user config + project-local overrides)
//! - Environment variable overrides for every setting
//! - Credential resolution with provenance (env var → config file)
//!
//! The output is a flat [`Settings`] value. Credential *shape* validation is
//! left to the directory provider; this crate only finds the values.

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod settings;
pub mod types;

pub use discovery::{
    LoadedConfig, load_config, load_config_file, load_config_with_options, xdg_config_dir,
    xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use secrets::{CredentialSlot, ResolvedSecret, SecretSource, resolve_credential};
pub use settings::{ResolvedCredentials, Settings};
pub use types::*;
