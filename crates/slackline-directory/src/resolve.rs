//! Resolving free-text queries to users.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use slackline_client::User;

use crate::error::{DirectoryError, Result};
use crate::normalize::normalize_name;

/// Which user field a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    /// Every field, exact matches before partial ones.
    #[default]
    Auto,
    Username,
    /// Display name, falling back to real name.
    DisplayName,
    RealName,
    Email,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Auto => "auto",
            SearchType::Username => "username",
            SearchType::DisplayName => "display_name",
            SearchType::RealName => "real_name",
            SearchType::Email => "email",
        }
    }
}

impl FromStr for SearchType {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(SearchType::Auto),
            "username" => Ok(SearchType::Username),
            "display_name" => Ok(SearchType::DisplayName),
            "real_name" => Ok(SearchType::RealName),
            "email" => Ok(SearchType::Email),
            other => Err(DirectoryError::InvalidQuery(format!(
                "unknown search type '{}'; expected one of: auto, username, display_name, real_name, email",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    DisplayName,
    RealName,
    Email,
}

impl Field {
    /// Comparable value of this field, or `None` when the field is not searched.
    fn value(&self, user: &User) -> Option<String> {
        let value = match self {
            // Usernames are always searched, even when empty.
            Field::Username => return Some(user.name.to_lowercase()),
            Field::DisplayName => normalize_name(&user.profile.display_name),
            Field::RealName => normalize_name(&user.real_name),
            Field::Email => user.profile.email.clone(),
        };
        (!value.is_empty()).then(|| value.to_lowercase())
    }
}

/// How a user matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    UsernameExact,
    UsernamePartial,
    DisplayNameExact,
    DisplayNamePartial,
    RealNameExact,
    RealNamePartial,
    EmailExact,
    EmailPartial,
}

impl MatchType {
    fn new(field: Field, exact: bool) -> Self {
        match (field, exact) {
            (Field::Username, true) => MatchType::UsernameExact,
            (Field::Username, false) => MatchType::UsernamePartial,
            (Field::DisplayName, true) => MatchType::DisplayNameExact,
            (Field::DisplayName, false) => MatchType::DisplayNamePartial,
            (Field::RealName, true) => MatchType::RealNameExact,
            (Field::RealName, false) => MatchType::RealNamePartial,
            (Field::Email, true) => MatchType::EmailExact,
            (Field::Email, false) => MatchType::EmailPartial,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(
            self,
            MatchType::UsernameExact
                | MatchType::DisplayNameExact
                | MatchType::RealNameExact
                | MatchType::EmailExact
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::UsernameExact => "username_exact",
            MatchType::UsernamePartial => "username_partial",
            MatchType::DisplayNameExact => "display_name_exact",
            MatchType::DisplayNamePartial => "display_name_partial",
            MatchType::RealNameExact => "real_name_exact",
            MatchType::RealNamePartial => "real_name_partial",
            MatchType::EmailExact => "email_exact",
            MatchType::EmailPartial => "email_partial",
        }
    }
}

/// One resolved user. Serializes to the CSV/JSON column layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResolution {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "realName")]
    pub real_name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub email: String,
    #[serde(rename = "matchType")]
    pub match_type: MatchType,
    #[serde(rename = "isBot")]
    pub is_bot: bool,
}

impl UserResolution {
    fn new(user: &User, match_type: MatchType) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            real_name: user.real_name.clone(),
            display_name: user.profile.display_name.clone(),
            email: user.profile.email.clone(),
            match_type,
            is_bot: user.is_bot,
        }
    }
}

/// Exact match on the first field that has one, else partial on the first
/// field that has one.
fn match_fields(user: &User, fields: &[Field], query: &str) -> Option<MatchType> {
    let values: Vec<(Field, String)> = fields
        .iter()
        .filter_map(|f| f.value(user).map(|v| (*f, v)))
        .collect();

    values
        .iter()
        .find(|(_, v)| v == query)
        .map(|(f, _)| MatchType::new(*f, true))
        .or_else(|| {
            values
                .iter()
                .find(|(_, v)| v.contains(query))
                .map(|(f, _)| MatchType::new(*f, false))
        })
}

fn match_user(user: &User, search: SearchType, query: &str) -> Option<MatchType> {
    match search {
        SearchType::Auto => match_fields(
            user,
            &[Field::Username, Field::DisplayName, Field::RealName, Field::Email],
            query,
        ),
        SearchType::Username => match_fields(user, &[Field::Username], query),
        SearchType::DisplayName => match_fields(user, &[Field::DisplayName], query)
            .or_else(|| match_fields(user, &[Field::RealName], query)),
        SearchType::RealName => match_fields(user, &[Field::RealName], query),
        SearchType::Email => match_fields(user, &[Field::Email], query),
    }
}

/// Search `users` for `query`.
///
/// The query is trimmed and a leading `@` dropped; matching ignores case.
/// Exact matches come first, then partial ones, each group ordered by user ID.
pub fn resolve_users(
    users: &HashMap<String, User>,
    query: &str,
    search: SearchType,
) -> Result<Vec<UserResolution>> {
    let query = query.trim();
    let query = query.strip_prefix('@').unwrap_or(query);
    if query.is_empty() {
        return Err(DirectoryError::InvalidQuery(
            "query must be a non-empty string".to_string(),
        ));
    }
    let query = query.to_lowercase();

    let mut ids: Vec<&String> = users.keys().collect();
    ids.sort();

    let (exact, partial): (Vec<UserResolution>, Vec<UserResolution>) = ids
        .into_iter()
        .filter_map(|id| {
            let user = &users[id];
            match_user(user, search, &query).map(|m| UserResolution::new(user, m))
        })
        .partition(|r| r.match_type.is_exact());

    Ok(exact.into_iter().chain(partial).collect())
}
