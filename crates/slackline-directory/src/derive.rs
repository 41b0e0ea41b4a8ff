//! Display name and purpose derivation.
//!
//! Direct and group direct messages have no name of their own, so one is
//! built from the user directory. Both functions here are pure: identical
//! inputs give byte-identical outputs, which is what makes re-deriving every
//! direct message on snapshot reload safe.

use std::collections::HashMap;

use slackline_client::{RawConversation, TextValue, User};

use crate::types::Conversation;

/// Build a cached conversation from its raw attributes and the current users.
pub fn derive_conversation(raw: &RawConversation, users: &HashMap<String, User>) -> Conversation {
    let mut name = raw.name.clone();
    let mut purpose = raw.purpose.value.clone();
    let mut topic = raw.topic.value.clone();
    let mut member_count = raw.num_members;
    let mut peer = String::new();

    if raw.is_im {
        member_count = 2;
        peer = raw.user.clone();

        if peer.is_empty() {
            // The member list of a DM holds the peer; take the first one we know.
            if let Some(id) = raw.members.iter().find(|id| users.contains_key(id.as_str())) {
                peer = id.clone();
            }
        }

        match users.get(&peer) {
            Some(user) => {
                name = format!("@{}", user.name);
                purpose = format!("DM with {}", user.real_name);
            }
            None => {
                name = format!("@{}", peer);
                purpose = format!("DM with {}", peer);
            }
        }
        topic.clear();
    } else if raw.is_mpim {
        // An mpim reported without members keeps its raw attributes.
        if !raw.members.is_empty() {
            member_count = raw.members.len() as u32;
            let names: Vec<&str> = raw
                .members
                .iter()
                .map(|id| users.get(id).map_or(id.as_str(), |u| u.real_name.as_str()))
                .collect();
            name = format!("@{}", raw.name_normalized);
            purpose = format!("Group DM with {}", names.join(", "));
            topic.clear();
        }
    } else {
        name = format!("#{}", raw.name_normalized);
    }

    Conversation {
        id: raw.id.clone(),
        name,
        topic,
        purpose,
        member_count,
        is_mpim: raw.is_mpim,
        is_im: raw.is_im,
        is_private: raw.is_private,
        user: peer,
        members: raw.members.clone(),
    }
}

/// Refresh a snapshot entry against the current user directory.
///
/// Direct messages are re-derived from their stored peer and members.
/// Channels and group DMs are returned unchanged: their names do not depend
/// on user profiles.
pub fn rederive_conversation(conv: Conversation, users: &HashMap<String, User>) -> Conversation {
    if !conv.is_im {
        return conv;
    }

    let raw = RawConversation {
        id: conv.id,
        name: String::new(),
        name_normalized: String::new(),
        topic: TextValue { value: conv.topic },
        purpose: TextValue {
            value: conv.purpose,
        },
        user: conv.user,
        members: conv.members,
        num_members: conv.member_count,
        is_im: true,
        is_mpim: conv.is_mpim,
        is_private: conv.is_private,
        is_archived: false,
    };
    derive_conversation(&raw, users)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str, real_name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            real_name: real_name.to_string(),
            ..Default::default()
        }
    }

    fn directory(users: &[User]) -> HashMap<String, User> {
        users.iter().map(|u| (u.id.clone(), u.clone())).collect()
    }

    fn dm(user: &str, members: &[&str]) -> RawConversation {
        RawConversation {
            id: "D1".to_string(),
            user: user.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            num_members: 0,
            is_im: true,
            is_private: true,
            topic: TextValue {
                value: "ignored".to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_dm_peer_from_members() {
        let users = directory(&[user("U1", "alice", "Alice A")]);
        let conv = derive_conversation(&dm("", &["U1"]), &users);

        assert_eq!(conv.name, "@alice");
        assert_eq!(conv.purpose, "DM with Alice A");
        assert_eq!(conv.member_count, 2);
        assert_eq!(conv.user, "U1");
        assert_eq!(conv.topic, "");
    }

    #[test]
    fn test_dm_skips_unknown_members() {
        let users = directory(&[user("U2", "bob", "Bob B")]);
        let conv = derive_conversation(&dm("", &["U9", "U2"]), &users);
        assert_eq!(conv.name, "@bob");
        assert_eq!(conv.user, "U2");
    }

    #[test]
    fn test_dm_unresolved_peer() {
        let users = directory(&[user("U1", "alice", "Alice A")]);
        let conv = derive_conversation(&dm("U9", &[]), &users);

        assert_eq!(conv.name, "@U9");
        assert_eq!(conv.purpose, "DM with U9");
        assert_eq!(conv.member_count, 2);
    }

    #[test]
    fn test_dm_without_any_peer() {
        let conv = derive_conversation(&dm("", &["U7"]), &HashMap::new());
        assert_eq!(conv.name, "@");
        assert_eq!(conv.purpose, "DM with ");
        assert_eq!(conv.user, "");
    }

    #[test]
    fn test_group_dm() {
        let users = directory(&[user("U1", "alice", "Alice A"), user("U2", "bob", "Bob B")]);
        let raw = RawConversation {
            id: "G1".to_string(),
            name: "mpdm-alice--bob-1".to_string(),
            name_normalized: "mpdm-alice--bob-1".to_string(),
            members: vec!["U1".to_string(), "U2".to_string()],
            num_members: 5,
            is_mpim: true,
            is_private: true,
            topic: TextValue {
                value: "lunch".to_string(),
            },
            ..Default::default()
        };
        let conv = derive_conversation(&raw, &users);

        assert_eq!(conv.name, "@mpdm-alice--bob-1");
        assert_eq!(conv.purpose, "Group DM with Alice A, Bob B");
        assert_eq!(conv.member_count, 2);
        assert_eq!(conv.topic, "");
    }

    #[test]
    fn test_group_dm_unknown_member_falls_back_to_id() {
        let users = directory(&[user("U1", "alice", "Alice A")]);
        let raw = RawConversation {
            id: "G1".to_string(),
            name_normalized: "mpdm-x".to_string(),
            members: vec!["U1".to_string(), "U3".to_string()],
            is_mpim: true,
            ..Default::default()
        };
        let conv = derive_conversation(&raw, &users);
        assert_eq!(conv.purpose, "Group DM with Alice A, U3");
    }

    #[test]
    fn test_group_dm_without_members_keeps_raw_attributes() {
        let raw = RawConversation {
            id: "G2".to_string(),
            name: "mpdm-raw".to_string(),
            name_normalized: "mpdm-raw".to_string(),
            topic: TextValue {
                value: "t".to_string(),
            },
            purpose: TextValue {
                value: "p".to_string(),
            },
            num_members: 4,
            is_mpim: true,
            ..Default::default()
        };
        let conv = derive_conversation(&raw, &HashMap::new());

        assert_eq!(conv.name, "mpdm-raw");
        assert_eq!(conv.topic, "t");
        assert_eq!(conv.purpose, "p");
        assert_eq!(conv.member_count, 4);
    }

    #[test]
    fn test_channel_passes_topic_and_purpose() {
        let raw = RawConversation {
            id: "C1".to_string(),
            name: "General".to_string(),
            name_normalized: "general".to_string(),
            topic: TextValue {
                value: "Company news".to_string(),
            },
            purpose: TextValue {
                value: "Announcements".to_string(),
            },
            num_members: 40,
            is_private: true,
            ..Default::default()
        };
        let conv = derive_conversation(&raw, &HashMap::new());

        assert_eq!(conv.name, "#general");
        assert_eq!(conv.topic, "Company news");
        assert_eq!(conv.purpose, "Announcements");
        assert_eq!(conv.member_count, 40);
        assert!(conv.is_private);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let users = directory(&[user("U1", "alice", "Alice A"), user("U2", "bob", "Bob B")]);
        let inputs = [
            dm("", &["U1"]),
            dm("U9", &[]),
            RawConversation {
                id: "G1".to_string(),
                name_normalized: "mpdm-a".to_string(),
                members: vec!["U1".to_string(), "U2".to_string()],
                is_mpim: true,
                ..Default::default()
            },
        ];

        for raw in &inputs {
            let first = derive_conversation(raw, &users);
            let second = derive_conversation(raw, &users);
            assert_eq!(first, second);
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }

    #[test]
    fn test_rederive_picks_up_new_profile() {
        let stale = derive_conversation(&dm("U1", &[]), &HashMap::new());
        assert_eq!(stale.name, "@U1");

        let users = directory(&[user("U1", "alice", "Alice A")]);
        let fresh = rederive_conversation(stale.clone(), &users);

        assert_eq!(fresh.name, "@alice");
        assert_eq!(fresh.purpose, "DM with Alice A");
        assert_eq!(fresh.id, stale.id);

        // Re-running on its own output is a no-op.
        assert_eq!(rederive_conversation(fresh.clone(), &users), fresh);
    }

    #[test]
    fn test_rederive_leaves_channels_alone() {
        let channel = Conversation {
            id: "C1".to_string(),
            name: "#general".to_string(),
            topic: "news".to_string(),
            member_count: 3,
            ..Default::default()
        };
        let users = directory(&[user("U1", "alice", "Alice A")]);
        assert_eq!(rederive_conversation(channel.clone(), &users), channel);
    }
}
