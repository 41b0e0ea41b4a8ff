//! Typed HTTP client for the workspace API.
//!
//! Two surfaces are covered:
//!
//! - **Standard**: `auth.test`, `users.list`, `conversations.list`, reached
//!   through the global API endpoint with cursor pagination.
//! - **Edge**: the organization-wide `client.userBoot` call, reached through
//!   the authenticated workspace URL, returning every conversation in a
//!   single unpaginated response.
//!
//! # Example
//!
//! ```no_run
//! use slackline_client::{SlackClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = SlackClient::builder()
//!     .token("xoxp-...")
//!     .build()?;
//!
//! let identity = client.auth().test().await?;
//! println!("Authenticated as {} on {}", identity.user, identity.team);
//!
//! let page = client.users().list(None).await?;
//! println!("First page has {} users", page.items.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, DEFAULT_USER_AGENT, SlackClient};
pub use error::{Error, Result};
pub use types::*;

pub use api::{AuthApi, ConversationsApi, EdgeApi, ListConversationsQuery, UsersApi};
