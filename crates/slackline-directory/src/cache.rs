//! Multiply-indexed directory cache.
//!
//! One canonical ID-keyed map per entity, plus inverse indices that are pure
//! functions of it. Merges take the write lock once per batch; lookups and
//! bulk copies take the read lock only for as long as the copy lasts.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;

use slackline_client::User;

use crate::normalize::normalize_name;
use crate::types::Conversation;

// ─────────────────────────────────────────────────────────────────────────────
// Indices
// ─────────────────────────────────────────────────────────────────────────────

/// Name → user ID inverse indices.
///
/// When several users share a key, the lowest ID holds it. Incremental
/// merges and [`rebuild`](Self::rebuild) apply the same rule, so the indices
/// are always a function of the ID-keyed map alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIndices {
    pub by_username: HashMap<String, String>,
    /// Keyed by normalized display name.
    pub by_display_name: HashMap<String, String>,
    /// Keyed by normalized real name.
    pub by_real_name: HashMap<String, String>,
    pub by_email: HashMap<String, String>,
}

impl UserIndices {
    /// Build every index from scratch.
    pub fn rebuild(users: &HashMap<String, User>) -> Self {
        let mut index = Self::default();
        for user in users.values() {
            index.insert(user);
        }
        index
    }

    fn keys(user: &User) -> impl Iterator<Item = (IndexField, String)> {
        [
            (IndexField::Username, user.name.clone()),
            (
                IndexField::DisplayName,
                normalize_name(&user.profile.display_name),
            ),
            (IndexField::RealName, normalize_name(&user.real_name)),
            (IndexField::Email, user.profile.email.clone()),
        ]
        .into_iter()
        // The username index keeps empty keys; the optional fields do not.
        .filter(|(field, key)| !key.is_empty() || *field == IndexField::Username)
    }

    fn map_mut(&mut self, field: IndexField) -> &mut HashMap<String, String> {
        match field {
            IndexField::Username => &mut self.by_username,
            IndexField::DisplayName => &mut self.by_display_name,
            IndexField::RealName => &mut self.by_real_name,
            IndexField::Email => &mut self.by_email,
        }
    }

    fn insert(&mut self, user: &User) {
        for (field, key) in Self::keys(user) {
            claim(self.map_mut(field), key, &user.id);
        }
    }

    /// Release the keys `old` held and hand each one to the lowest remaining
    /// holder in `users`, which must already reflect the overwrite.
    fn release(&mut self, old: &User, users: &HashMap<String, User>) {
        for (field, key) in Self::keys(old) {
            let map = self.map_mut(field);
            if map.get(&key) != Some(&old.id) {
                continue;
            }
            map.remove(&key);
            for user in users.values() {
                if Self::keys(user).any(|(f, k)| f == field && k == key) {
                    claim(self.map_mut(field), key.clone(), &user.id);
                }
            }
        }
    }
}

/// Point `key` at `id` unless a lower ID already holds it.
fn claim(map: &mut HashMap<String, String>, key: String, id: &str) {
    match map.get(&key) {
        Some(holder) if holder.as_str() <= id => {}
        _ => {
            map.insert(key, id.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexField {
    Username,
    DisplayName,
    RealName,
    Email,
}

/// Derived name → conversation ID index. Colliding names go to the lowest ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationIndex {
    pub by_name: HashMap<String, String>,
}

impl ConversationIndex {
    /// Build the index from scratch.
    pub fn rebuild(conversations: &HashMap<String, Conversation>) -> Self {
        let mut index = Self::default();
        for conv in conversations.values() {
            claim(&mut index.by_name, conv.name.clone(), &conv.id);
        }
        index
    }

    fn release(&mut self, old: &Conversation, conversations: &HashMap<String, Conversation>) {
        if self.by_name.get(&old.name) != Some(&old.id) {
            return;
        }
        self.by_name.remove(&old.name);
        for conv in conversations.values().filter(|c| c.name == old.name) {
            claim(&mut self.by_name, conv.name.clone(), &conv.id);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bulk views
// ─────────────────────────────────────────────────────────────────────────────

/// Point-in-time copy of the user directory.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    pub users: HashMap<String, User>,
    pub index: UserIndices,
}

/// Point-in-time copy of the conversation directory.
#[derive(Debug, Clone, Default)]
pub struct ConversationDirectory {
    pub conversations: HashMap<String, Conversation>,
    pub index: ConversationIndex,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────

/// The in-memory directory.
///
/// Entries are inserted or overwritten by ID, never deleted: a user or
/// conversation removed remotely disappears only when the process restarts
/// against a replaced snapshot.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    users: RwLock<UserDirectory>,
    conversations: RwLock<ConversationDirectory>,
}

impl DirectoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Merges ───────────────────────────────────────────────────────────────

    /// Insert or overwrite users by ID, updating every inverse index.
    pub fn merge_users(&self, users: impl IntoIterator<Item = User>) -> usize {
        let mut guard = self.users.write();
        let UserDirectory { users: map, index } = &mut *guard;
        let mut merged = 0;
        for user in users {
            index.insert(&user);
            if let Some(old) = map.insert(user.id.clone(), user) {
                index.release(&old, map);
            }
            merged += 1;
        }
        trace!(merged, total = map.len(), "Merged users");
        merged
    }

    /// Insert or overwrite conversations by ID, updating the name index.
    pub fn merge_conversations(&self, conversations: impl IntoIterator<Item = Conversation>) -> usize {
        let mut guard = self.conversations.write();
        let ConversationDirectory {
            conversations: map,
            index,
        } = &mut *guard;
        let mut merged = 0;
        for conv in conversations {
            claim(&mut index.by_name, conv.name.clone(), &conv.id);
            if let Some(old) = map.insert(conv.id.clone(), conv) {
                index.release(&old, map);
            }
            merged += 1;
        }
        trace!(merged, total = map.len(), "Merged conversations");
        merged
    }

    // ── User lookups ─────────────────────────────────────────────────────────

    /// Look up a user by ID.
    pub fn user(&self, id: &str) -> Option<User> {
        self.users.read().users.get(id).cloned()
    }

    /// Look up a user by username.
    pub fn user_by_username(&self, name: &str) -> Option<User> {
        let dir = self.users.read();
        dir.index.by_username.get(name).and_then(|id| dir.users.get(id)).cloned()
    }

    /// Look up a user by display name (normalized before matching).
    pub fn user_by_display_name(&self, name: &str) -> Option<User> {
        let dir = self.users.read();
        dir.index
            .by_display_name
            .get(&normalize_name(name))
            .and_then(|id| dir.users.get(id))
            .cloned()
    }

    /// Look up a user by real name (normalized before matching).
    pub fn user_by_real_name(&self, name: &str) -> Option<User> {
        let dir = self.users.read();
        dir.index
            .by_real_name
            .get(&normalize_name(name))
            .and_then(|id| dir.users.get(id))
            .cloned()
    }

    /// Look up a user by email address.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let dir = self.users.read();
        dir.index.by_email.get(email).and_then(|id| dir.users.get(id)).cloned()
    }

    /// Number of cached users.
    pub fn user_count(&self) -> usize {
        self.users.read().users.len()
    }

    /// Copy of the ID-keyed user map.
    pub fn user_map(&self) -> HashMap<String, User> {
        self.users.read().users.clone()
    }

    /// Copy of the full user directory, indices included.
    pub fn users_snapshot(&self) -> UserDirectory {
        self.users.read().clone()
    }

    // ── Conversation lookups ─────────────────────────────────────────────────

    /// Look up a conversation by ID.
    pub fn conversation(&self, id: &str) -> Option<Conversation> {
        self.conversations.read().conversations.get(id).cloned()
    }

    /// Look up a conversation by derived name (`#general`, `@alice`).
    pub fn conversation_by_name(&self, name: &str) -> Option<Conversation> {
        let dir = self.conversations.read();
        dir.index
            .by_name
            .get(name)
            .and_then(|id| dir.conversations.get(id))
            .cloned()
    }

    /// Number of cached conversations.
    pub fn conversation_count(&self) -> usize {
        self.conversations.read().conversations.len()
    }

    /// Copy of the full conversation directory, index included.
    pub fn conversations_snapshot(&self) -> ConversationDirectory {
        self.conversations.read().clone()
    }
}
