//! API method groups.

mod auth;
mod conversations;
mod edge;
mod users;

pub use auth::AuthApi;
pub use conversations::{ConversationsApi, ListConversationsQuery};
pub use edge::EdgeApi;
pub use users::UsersApi;
