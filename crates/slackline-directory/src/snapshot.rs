//! On-disk directory snapshots.
//!
//! Each snapshot is a pretty-printed JSON array, sorted by ID so that
//! unchanged directories produce unchanged files. Records are stored as
//! received; index normalization happens again when they are merged back in.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use slackline_client::User;

use crate::error::{DirectoryError, Result};
use crate::types::Conversation;

/// Directory name under the platform cache root.
const CACHE_DIR_NAME: &str = "slackline";

/// Platform cache directory for snapshots, e.g. `~/.cache/slackline`.
///
/// Falls back to the working directory when the platform has no cache root.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR_NAME)
}

/// Reads and writes the two snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    users_path: PathBuf,
    conversations_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(users_path: impl Into<PathBuf>, conversations_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
            conversations_path: conversations_path.into(),
        }
    }

    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    pub fn conversations_path(&self) -> &Path {
        &self.conversations_path
    }

    /// Load the user snapshot. `Ok(None)` when no snapshot exists yet.
    pub fn load_users(&self) -> Result<Option<Vec<User>>> {
        load(&self.users_path)
    }

    /// Load the conversation snapshot. `Ok(None)` when no snapshot exists yet.
    pub fn load_conversations(&self) -> Result<Option<Vec<Conversation>>> {
        load(&self.conversations_path)
    }

    /// Write every user, sorted by ID.
    pub fn store_users(&self, users: &HashMap<String, User>) -> Result<usize> {
        store(&self.users_path, sorted(users))
    }

    /// Write every conversation, sorted by ID.
    pub fn store_conversations(&self, conversations: &HashMap<String, Conversation>) -> Result<usize> {
        store(&self.conversations_path, sorted(conversations))
    }
}

fn sorted<T>(map: &HashMap<String, T>) -> Vec<&T> {
    let mut entries: Vec<(&String, &T)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, v)| v).collect()
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No snapshot on disk");
            return Ok(None);
        }
        Err(source) => {
            return Err(DirectoryError::SnapshotIo {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let items = serde_json::from_slice(&data).map_err(|source| DirectoryError::SnapshotFormat {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(items))
}

fn store<T: Serialize>(path: &Path, items: Vec<&T>) -> Result<usize> {
    let io_err = |source| DirectoryError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_private_dir(parent).map_err(io_err)?;
    }

    let json = serde_json::to_vec_pretty(&items).map_err(|source| DirectoryError::SnapshotFormat {
        path: path.to_path_buf(),
        source,
    })?;

    // Write beside the target and rename, so readers never see a torn file.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(items.len())
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
