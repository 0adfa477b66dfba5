//! The shared chat-room registry of a room cluster.
//!
//! # Sharing
//!
//! A `ChatList` is a handle: cloning it clones an `Arc`, not the rooms.
//! Every player of a cluster who adopted the list sees the same rooms, and
//! a room created through one handle is visible through all of them.
//!
//! The internal lock is only held for the duration of a single call, so a
//! `ChatList` method never blocks on anything outside this crate.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use roomcast_protocol::{ChatKey, PlayerKey};

use crate::{ChatError, ChatRoom, ChatRoomInfo};

/// Result of removing a member from a chat room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRemoval {
    /// `true` if the room has no members left.
    pub now_empty: bool,
}

/// Shared handle to the chat rooms of a room cluster.
#[derive(Clone, Default)]
pub struct ChatList {
    rooms: Arc<Mutex<BTreeMap<ChatKey, ChatRoom>>>,
}

impl ChatList {
    /// Creates a new, empty chat list.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ChatKey, ChatRoom>> {
        // A panic while holding the lock cannot leave a half-applied
        // update: every mutation below is a single map or set operation.
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles point at the same registry.
    pub fn same_list(&self, other: &ChatList) -> bool {
        Arc::ptr_eq(&self.rooms, &other.rooms)
    }

    /// Number of chat rooms.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, key: ChatKey) -> bool {
        self.lock().contains_key(&key)
    }

    /// Registers a new chat room unless the list already holds `limit`
    /// rooms. Check and insert happen under one lock.
    ///
    /// # Errors
    /// - [`ChatError::TooManyRooms`] when full
    /// - [`ChatError::DefaultChat`] for the reserved default key
    /// - [`ChatError::AlreadyExists`] if the key is taken
    pub fn add_room_bounded(&self, room: ChatRoom, limit: usize) -> Result<(), ChatError> {
        if room.key().is_default() {
            return Err(ChatError::DefaultChat);
        }
        let mut rooms = self.lock();
        if rooms.len() >= limit {
            return Err(ChatError::TooManyRooms(limit));
        }
        if rooms.contains_key(&room.key()) {
            return Err(ChatError::AlreadyExists(room.key()));
        }
        tracing::debug!(chat = %room.key(), name = room.name(), "chat room added");
        rooms.insert(room.key(), room);
        Ok(())
    }

    /// Descriptions of every room, in key order.
    pub fn room_infos(&self) -> Vec<ChatRoomInfo> {
        self.lock().values().map(ChatRoom::info).collect()
    }

    /// Members of one room, in key order.
    ///
    /// # Errors
    /// [`ChatError::NotFound`] if no such room exists.
    pub fn members(&self, key: ChatKey) -> Result<Vec<PlayerKey>, ChatError> {
        self.lock()
            .get(&key)
            .map(ChatRoom::members)
            .ok_or(ChatError::NotFound(key))
    }

    /// Adds a player to a room.
    ///
    /// # Errors
    /// [`ChatError::NotFound`] if no such room exists.
    pub fn add_member(&self, key: ChatKey, player: PlayerKey) -> Result<(), ChatError> {
        let mut rooms = self.lock();
        let room = rooms.get_mut(&key).ok_or(ChatError::NotFound(key))?;
        room.add_member(player);
        Ok(())
    }

    /// Removes a player from a room and reports whether it is now empty.
    ///
    /// The room itself is kept; deleting empty rooms is the caller's
    /// decision.
    ///
    /// # Errors
    /// - [`ChatError::NotFound`] if no such room exists
    /// - [`ChatError::NotMember`] if the player was not a member
    pub fn remove_member(
        &self,
        key: ChatKey,
        player: &PlayerKey,
    ) -> Result<MemberRemoval, ChatError> {
        let mut rooms = self.lock();
        let room = rooms.get_mut(&key).ok_or(ChatError::NotFound(key))?;
        room.remove_member(player)?;
        Ok(MemberRemoval {
            now_empty: room.is_empty(),
        })
    }

    /// Removes `key` only if it has no members left.
    ///
    /// Returns `true` if the room was removed. Checking and removing under
    /// one lock keeps a concurrent joiner from being dropped with the room.
    pub fn remove_room_if_empty(&self, key: ChatKey) -> bool {
        let mut rooms = self.lock();
        match rooms.get(&key) {
            Some(room) if room.is_empty() => {
                rooms.remove(&key);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ChatList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatList")
            .field("rooms", &self.room_infos())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(key: &str) -> PlayerKey {
        PlayerKey::new(key)
    }

    fn add(list: &ChatList, key: u64, creator: &str) -> Result<(), ChatError> {
        list.add_room_bounded(ChatRoom::new(ChatKey(key), "tavern", pk(creator)), 5)
    }

    fn list_with_room(key: u64, creator: &str) -> ChatList {
        let list = ChatList::new();
        add(&list, key, creator).unwrap();
        list
    }

    #[test]
    fn test_clone_shares_rooms() {
        let list = ChatList::new();
        let other = list.clone();

        add(&list, 1, "ann").unwrap();

        assert!(other.contains(ChatKey(1)));
        assert!(list.same_list(&other));
        assert!(!list.same_list(&ChatList::new()));
    }

    #[test]
    fn test_add_room_bounded_duplicate_key_returns_error() {
        let list = list_with_room(1, "ann");
        let result = add(&list, 1, "bob");
        assert!(matches!(result, Err(ChatError::AlreadyExists(k)) if k == ChatKey(1)));
    }

    #[test]
    fn test_add_room_bounded_default_key_rejected() {
        let list = ChatList::new();
        let result = add(&list, 0, "ann");
        assert!(matches!(result, Err(ChatError::DefaultChat)));
    }

    #[test]
    fn test_add_room_bounded_refuses_when_full() {
        let list = ChatList::new();
        list.add_room_bounded(ChatRoom::new(ChatKey(1), "a", pk("ann")), 2)
            .unwrap();
        list.add_room_bounded(ChatRoom::new(ChatKey(2), "b", pk("ann")), 2)
            .unwrap();

        let result =
            list.add_room_bounded(ChatRoom::new(ChatKey(3), "c", pk("ann")), 2);

        assert!(matches!(result, Err(ChatError::TooManyRooms(2))));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_members_unknown_room_returns_not_found() {
        let list = ChatList::new();
        assert!(matches!(
            list.members(ChatKey(9)),
            Err(ChatError::NotFound(k)) if k == ChatKey(9)
        ));
    }

    #[test]
    fn test_add_then_remove_member_reports_not_empty() {
        let list = list_with_room(1, "ann");
        list.add_member(ChatKey(1), pk("bob")).unwrap();

        let removal = list.remove_member(ChatKey(1), &pk("bob")).unwrap();

        assert!(!removal.now_empty);
        assert_eq!(list.members(ChatKey(1)).unwrap(), vec![pk("ann")]);
    }

    #[test]
    fn test_remove_last_member_reports_empty_but_keeps_room() {
        let list = list_with_room(1, "ann");

        let removal = list.remove_member(ChatKey(1), &pk("ann")).unwrap();

        assert!(removal.now_empty);
        assert!(list.contains(ChatKey(1)));
    }

    #[test]
    fn test_remove_member_not_member_returns_error() {
        let list = list_with_room(1, "ann");
        let result = list.remove_member(ChatKey(1), &pk("bob"));
        assert!(matches!(result, Err(ChatError::NotMember(..))));
    }

    #[test]
    fn test_remove_room_if_empty_keeps_occupied_room() {
        let list = list_with_room(1, "ann");
        assert!(!list.remove_room_if_empty(ChatKey(1)));
        list.remove_member(ChatKey(1), &pk("ann")).unwrap();
        assert!(list.remove_room_if_empty(ChatKey(1)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_room_infos_in_key_order() {
        let list = ChatList::new();
        add(&list, 3, "ann").unwrap();
        add(&list, 1, "ann").unwrap();

        let keys: Vec<ChatKey> = list.room_infos().iter().map(|i| i.key).collect();
        assert_eq!(keys, vec![ChatKey(1), ChatKey(3)]);
    }
}
