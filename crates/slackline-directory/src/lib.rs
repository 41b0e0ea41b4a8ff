//! Workspace directory provider.
//!
//! Mirrors a remote workspace's users and conversations into a local,
//! multiply-indexed cache that tool handlers can query without touching the
//! network.
//!
//! # Architecture
//!
//! ```text
//! CredentialSlots ──select──▶ Credential
//!                                 │
//!                                 ▼
//!                     Session (lazy, auth.test once)
//!                                 │ Identity picks the backend
//!                                 ▼
//!          DirectoryBackend { Standard | Enterprise }
//!                                 │ pages, one permit per page
//!                                 ▼
//!          Fetcher ──derive──▶ DirectoryCache ◀──▶ SnapshotStore
//! ```
//!
//! Lookups read [`DirectoryCache`] directly and never trigger a fetch.
//!
//! # Example
//!
//! ```rust,ignore
//! use slackline_directory::{CredentialSlots, DirectoryProvider, ProviderConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let slots = CredentialSlots {
//!     user_token: Some("xoxp-...".into()),
//!     ..Default::default()
//! };
//! let provider = DirectoryProvider::new(ProviderConfig::new(slots))?;
//! provider.refresh(&CancellationToken::new()).await?;
//!
//! let general = provider.cache().conversation_by_name("#general");
//! ```

mod backend;
mod cache;
mod config;
mod credentials;
mod derive;
mod error;
mod fetcher;
mod normalize;
mod provider;
mod resolve;
mod session;
mod snapshot;
mod throttle;
mod types;

pub use backend::{DirectoryBackend, EnterpriseBackend, StandardBackend};
pub use cache::{ConversationDirectory, ConversationIndex, DirectoryCache, UserDirectory, UserIndices};
pub use config::{HttpSettings, ProviderConfig, RateConfig};
pub use credentials::{AuthMode, Credential, CredentialSlots, select_credential};
pub use derive::{derive_conversation, rederive_conversation};
pub use error::{CredentialError, DirectoryError, Result};
pub use fetcher::Fetcher;
pub use normalize::normalize_name;
pub use provider::DirectoryProvider;
pub use resolve::{MatchType, SearchType, UserResolution, resolve_users};
pub use session::Session;
pub use snapshot::{SnapshotStore, default_cache_dir};
pub use throttle::{PageThrottle, Throttle, Unthrottled};
pub use types::{Conversation, ConversationKind, Identity, Protocol};

pub use slackline_client::{ConversationType, RawConversation, User, UserProfile};
