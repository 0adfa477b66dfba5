//! A single named chat room.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use roomcast_protocol::{ChatKey, PlayerKey};
use serde::{Deserialize, Serialize};

use crate::ChatError;

/// Counter for generating chat keys. Starts at 1: `chat-0` is the default.
static NEXT_CHAT_KEY: AtomicU64 = AtomicU64::new(1);

/// Returns a fresh, process-unique chat key.
pub fn next_chat_key() -> ChatKey {
    ChatKey(NEXT_CHAT_KEY.fetch_add(1, Ordering::Relaxed))
}

/// The public description of a chat room, without its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoomInfo {
    pub key: ChatKey,
    pub name: String,
    pub creator: PlayerKey,
}

/// A named chat room and its member set.
#[derive(Debug, Clone)]
pub struct ChatRoom {
    key: ChatKey,
    name: String,
    creator: PlayerKey,
    members: BTreeSet<PlayerKey>,
}

impl ChatRoom {
    /// Creates a room with its creator as the only member.
    pub fn new(key: ChatKey, name: impl Into<String>, creator: PlayerKey) -> Self {
        let mut members = BTreeSet::new();
        members.insert(creator.clone());
        Self {
            key,
            name: name.into(),
            creator,
            members,
        }
    }

    pub fn key(&self) -> ChatKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn creator(&self) -> &PlayerKey {
        &self.creator
    }

    pub fn info(&self) -> ChatRoomInfo {
        ChatRoomInfo {
            key: self.key,
            name: self.name.clone(),
            creator: self.creator.clone(),
        }
    }

    /// Adds a member. Adding an existing member is a no-op.
    pub fn add_member(&mut self, player: PlayerKey) {
        self.members.insert(player);
    }

    /// Removes a member.
    ///
    /// # Errors
    /// [`ChatError::NotMember`] if the player was not in the room.
    pub fn remove_member(&mut self, player: &PlayerKey) -> Result<(), ChatError> {
        if !self.members.remove(player) {
            return Err(ChatError::NotMember(player.clone(), self.key));
        }
        Ok(())
    }

    pub fn is_member(&self, player: &PlayerKey) -> bool {
        self.members.contains(player)
    }

    /// Members in key order.
    pub fn members(&self) -> Vec<PlayerKey> {
        self.members.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(key: &str) -> PlayerKey {
        PlayerKey::new(key)
    }

    #[test]
    fn test_next_chat_key_never_returns_default() {
        let a = next_chat_key();
        let b = next_chat_key();
        assert!(!a.is_default());
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_room_contains_creator() {
        let room = ChatRoom::new(ChatKey(5), "tavern", pk("ann"));
        assert!(room.is_member(&pk("ann")));
        assert_eq!(room.members(), vec![pk("ann")]);
        assert_eq!(room.creator(), &pk("ann"));
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let mut room = ChatRoom::new(ChatKey(5), "tavern", pk("ann"));
        room.add_member(pk("bob"));
        room.add_member(pk("bob"));
        assert_eq!(room.members(), vec![pk("ann"), pk("bob")]);
    }

    #[test]
    fn test_remove_member_unknown_returns_not_member() {
        let mut room = ChatRoom::new(ChatKey(5), "tavern", pk("ann"));
        let result = room.remove_member(&pk("zed"));
        assert!(matches!(result, Err(ChatError::NotMember(p, k)) if p == pk("zed") && k == ChatKey(5)));
    }

    #[test]
    fn test_remove_last_member_empties_room() {
        let mut room = ChatRoom::new(ChatKey(5), "tavern", pk("ann"));
        room.remove_member(&pk("ann")).unwrap();
        assert!(room.is_empty());
    }

    #[test]
    fn test_info_drops_members() {
        let room = ChatRoom::new(ChatKey(5), "tavern", pk("ann"));
        let info = room.info();
        assert_eq!(info.key, ChatKey(5));
        assert_eq!(info.name, "tavern");
        assert_eq!(info.creator, pk("ann"));
    }
}
