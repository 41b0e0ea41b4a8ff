//! Error types for the directory provider.

use std::path::PathBuf;
use std::sync::Arc;

/// Credential configuration problems. Always fatal: the process must not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// No slot holds a credential.
    #[error(
        "authentication required: provide a session token with its cookie (xoxc-/xoxd-), a user token (xoxp-), or a bot token (xoxb-)"
    )]
    Missing,

    /// Half of a session pair was supplied and no other credential exists.
    #[error("session authentication needs both a token and a cookie; the {missing} is missing")]
    IncompleteSession {
        /// Which half is absent.
        missing: &'static str,
    },

    /// A value of one shape sits in the slot for another.
    #[error("the {slot} slot holds a {found} credential; {hint}")]
    WrongSlot {
        /// Slot that was inspected.
        slot: &'static str,
        /// Shape detected from the value.
        found: &'static str,
        /// How to fix the configuration.
        hint: &'static str,
    },

    /// A value does not have the prefix its slot requires.
    #[error("the {slot} slot must hold a value starting with '{expected}'")]
    Malformed {
        slot: &'static str,
        expected: &'static str,
    },
}

/// Error type for directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Credential selection failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The HTTP client could not be constructed from the settings.
    ///
    /// Shared so a session can hand the same failure to every later caller.
    #[error("client setup failed: {0}")]
    ClientSetup(#[source] Arc<slackline_client::Error>),

    /// The identity round trip failed or rejected the credential.
    #[error("authentication failed: {0}")]
    Auth(#[source] Arc<slackline_client::Error>),

    /// A page request failed; whatever merged before it is retained.
    #[error("directory fetch failed: {0}")]
    Fetch(#[from] slackline_client::Error),

    /// The caller cancelled the refresh.
    #[error("directory fetch cancelled")]
    Cancelled,

    /// Snapshot file could not be read or written.
    #[error("snapshot I/O on '{}': {source}", path.display())]
    SnapshotIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Snapshot file exists but does not parse.
    #[error("snapshot '{}' is malformed: {source}", path.display())]
    SnapshotFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A search query was rejected.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl DirectoryError {
    /// Whether the process should refuse to continue.
    ///
    /// Configuration and authentication errors never heal on retry; fetch,
    /// cancellation, and snapshot errors leave the process usable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DirectoryError::Credential(_) | DirectoryError::ClientSetup(_) | DirectoryError::Auth(_)
        )
    }
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
