//! Chat membership as seen from a router.
//!
//! The chat crate keeps the books; this module decides who hears about
//! changes. Chat events are announced to the local group only. A cluster's
//! [`ChatList`] travels between players by handle: the first player to
//! create a named room allocates it, and later arrivals adopt the handle of
//! a player already standing in the room.

use std::sync::Arc;

use roomcast_chat::{ChatError, ChatList, ChatRoom, next_chat_key};
use roomcast_protocol::{ChatKey, DEFAULT_CHAT, PlayerKey, Scope, ServerMessage, VoiceLevel};
use roomcast_session::Player;

use crate::router::PlayerMap;
use crate::{MessageRouter, RouterError};

/// Told to a player who speaks in a chat room they are not in.
pub const NO_ONE_CAN_HEAR: &str = "No one can hear you!";

fn require_present<R: MessageRouter + ?Sized>(
    router: &R,
    player: &Arc<Player>,
) -> Result<(), RouterError> {
    if router.group().contains(player.key()) {
        Ok(())
    } else {
        Err(RouterError::PlayerNotFound(
            player.key().clone(),
            router.location(),
        ))
    }
}

/// Finds the chat list of another connected player of the local group.
///
/// Callers must hold the group lock across the lookup and any handout.
fn peer_chat_list(players: &PlayerMap, player: &PlayerKey) -> Option<ChatList> {
    players
        .values()
        .filter(|p| p.key() != player && p.is_connected_to_game())
        .find_map(|p| p.chat_list())
}

/// Puts a player who just arrived into the cluster's chat.
///
/// A player re-added while still in a named room leaves it first. The
/// player is then announced in the default chat room, receives the default
/// roster, and adopts the chat list of a peer if any peer has one. An
/// adopted list is replayed as one `ChatRoomCreated` per room.
pub(crate) fn join_cluster_chat<R: MessageRouter + ?Sized>(router: &R, player: &Arc<Player>) {
    let key = player.key();
    leave_named_chat_or_reset(router, player);
    player.set_current_chat(DEFAULT_CHAT);

    router.group().send(
        &[ServerMessage::AddPlayerToChatRoom {
            player: key.clone(),
            chat: DEFAULT_CHAT,
        }],
        Some(key),
    );
    player.send_message(ServerMessage::SetCurrentChatRoom {
        chat: DEFAULT_CHAT,
        players: router.group().keys(),
    });

    let adopted = {
        let players = router.group().lock();
        let adopted = peer_chat_list(&players, key);
        player.set_chat_list(adopted.clone());
        adopted
    };

    let Some(list) = adopted else {
        return;
    };
    for info in list.room_infos() {
        player.send_message(ServerMessage::ChatRoomCreated {
            chat: info.key,
            name: info.name,
            creator: info.creator,
        });
    }
    tracing::debug!(player = %key, rooms = list.len(), "chat list adopted");
}

/// Chat cleanup for a player who is no longer in the router's group.
///
/// Never fails: a broken named-chat state falls back to the default chat.
pub(crate) fn leave_cluster_chat<R: MessageRouter + ?Sized>(router: &R, player: &Arc<Player>) {
    if player.current_chat().is_default() {
        router.group().send(
            &[ServerMessage::RemPlayerFromChatRoom {
                player: player.key().clone(),
                chat: DEFAULT_CHAT,
            }],
            None,
        );
    } else {
        leave_named_chat_or_reset(router, player);
    }
    player.set_chat_list(None);
}

/// Leaves the current named chat room, if any. On failure the player is
/// forced back to the default chat.
pub(crate) fn leave_named_chat_or_reset<R: MessageRouter + ?Sized>(
    router: &R,
    player: &Arc<Player>,
) {
    if player.current_chat().is_default() {
        return;
    }
    if let Err(e) = leave_named_chat(router, player) {
        tracing::error!(
            player = %player.key(),
            error = %e,
            "chat cleanup failed, falling back to default chat"
        );
        player.set_current_chat(DEFAULT_CHAT);
    }
}

/// Removes a player from their current named chat room.
///
/// Announces the departure to the local group. A room left empty is
/// deleted and its deletion announced.
///
/// # Errors
/// - [`ChatError::DefaultChat`] if the player is in the default chat
/// - [`ChatError::NoChatList`] if the player has no chat list
/// - [`ChatError::NotFound`] / [`ChatError::NotMember`] for stale state
pub(crate) fn leave_named_chat<R: MessageRouter + ?Sized>(
    router: &R,
    player: &Arc<Player>,
) -> Result<(), RouterError> {
    let chat = player.current_chat();
    if chat.is_default() {
        return Err(ChatError::DefaultChat.into());
    }
    let list = player
        .chat_list()
        .ok_or_else(|| ChatError::NoChatList(player.key().clone()))?;

    let removal = list.remove_member(chat, player.key())?;
    player.set_current_chat(DEFAULT_CHAT);

    let mut msgs = vec![ServerMessage::RemPlayerFromChatRoom {
        player: player.key().clone(),
        chat,
    }];
    if removal.now_empty && list.remove_room_if_empty(chat) {
        tracing::info!(%chat, "empty chat room deleted");
        msgs.push(ServerMessage::ChatRoomDeleted { chat });
    }
    router.group().send(&msgs, None);
    tracing::debug!(player = %player.key(), %chat, "left chat room");
    Ok(())
}

// ---------------------------------------------------------------------------
// ChatRouting
// ---------------------------------------------------------------------------

/// Chat operations for players standing in a router's local group.
///
/// Implemented for every [`MessageRouter`], including trait objects.
pub trait ChatRouting {
    /// Creates a named chat room with `player` as its first member and
    /// returns its key.
    ///
    /// The name is cut to `max_name_len` characters. If nobody in the local
    /// group has a chat list yet, a new one is handed to all of them.
    ///
    /// # Errors
    /// [`ChatError::TooManyRooms`] once the cluster holds
    /// `max_chat_rooms_per_cluster` rooms.
    fn create_chat_room(&self, player: &Arc<Player>, name: &str) -> Result<ChatKey, RouterError>;

    /// Moves `player` into the named room `chat`. Joining
    /// [`DEFAULT_CHAT`] is the same as [`leave_chat_room`](Self::leave_chat_room).
    fn join_chat_room(&self, player: &Arc<Player>, chat: ChatKey) -> Result<(), RouterError>;

    /// Moves `player` back to the default chat.
    fn leave_chat_room(&self, player: &Arc<Player>) -> Result<(), RouterError>;

    /// Delivers a line of chat according to its voice level.
    ///
    /// Whispers and normal speech in the default chat reach the local
    /// group. In a named room they reach the room's members within the
    /// 2-ring; whispers only reach members who have spoken there. Shouts
    /// reach the 2-ring regardless of chat room.
    fn send_text(
        &self,
        player: &Arc<Player>,
        chat: ChatKey,
        voice: VoiceLevel,
        text: &str,
    ) -> Result<(), RouterError>;
}

impl<R: MessageRouter + ?Sized> ChatRouting for R {
    fn create_chat_room(&self, player: &Arc<Player>, name: &str) -> Result<ChatKey, RouterError> {
        require_present(self, player)?;
        let config = self.chat_config();
        let name = config.truncate_name(name);
        let limit = config.max_chat_rooms_per_cluster;

        let list = {
            let players = self.group().lock();
            let list = match player.chat_list().or_else(|| peer_chat_list(&players, player.key())) {
                Some(list) => list,
                None => {
                    let list = ChatList::new();
                    for p in players.values() {
                        if p.chat_list().is_none() {
                            p.set_chat_list(Some(list.clone()));
                        }
                    }
                    tracing::debug!(location = %self.location(), "chat list allocated");
                    list
                }
            };
            player.set_chat_list(Some(list.clone()));
            list
        };

        if list.len() >= limit {
            return Err(ChatError::TooManyRooms(limit).into());
        }
        leave_named_chat_or_reset(self, player);

        let chat = next_chat_key();
        list.add_room_bounded(ChatRoom::new(chat, name.clone(), player.key().clone()), limit)?;
        player.set_current_chat(chat);
        player.set_is_chat_member(true);

        tracing::info!(player = %player.key(), %chat, name = %name, "chat room created");
        self.group().send(
            &[ServerMessage::ChatRoomCreated {
                chat,
                name,
                creator: player.key().clone(),
            }],
            None,
        );
        player.send_message(ServerMessage::SetCurrentChatRoom {
            chat,
            players: vec![player.key().clone()],
        });
        Ok(chat)
    }

    fn join_chat_room(&self, player: &Arc<Player>, chat: ChatKey) -> Result<(), RouterError> {
        if chat.is_default() {
            return self.leave_chat_room(player);
        }
        require_present(self, player)?;
        let list = player
            .chat_list()
            .ok_or_else(|| ChatError::NoChatList(player.key().clone()))?;
        if !list.contains(chat) {
            return Err(ChatError::NotFound(chat).into());
        }
        if player.current_chat() == chat {
            return Ok(());
        }

        leave_named_chat_or_reset(self, player);
        list.add_member(chat, player.key().clone())?;
        player.set_current_chat(chat);

        tracing::debug!(player = %player.key(), %chat, "joined chat room");
        self.group().send(
            &[ServerMessage::AddPlayerToChatRoom {
                player: player.key().clone(),
                chat,
            }],
            None,
        );
        player.send_message(ServerMessage::SetCurrentChatRoom {
            chat,
            players: list.members(chat)?,
        });
        Ok(())
    }

    fn leave_chat_room(&self, player: &Arc<Player>) -> Result<(), RouterError> {
        require_present(self, player)?;
        leave_named_chat(self, player)?;
        player.send_message(ServerMessage::SetCurrentChatRoom {
            chat: DEFAULT_CHAT,
            players: self.group().keys(),
        });
        Ok(())
    }

    fn send_text(
        &self,
        player: &Arc<Player>,
        chat: ChatKey,
        voice: VoiceLevel,
        text: &str,
    ) -> Result<(), RouterError> {
        require_present(self, player)?;
        let sender = player.key();
        let mut text = self.chat_config().truncate_message(text);
        if voice == VoiceLevel::Shout {
            text = text.to_uppercase();
        }
        let msg = ServerMessage::ChatText {
            sender: sender.clone(),
            chat,
            voice,
            text,
        };

        if chat == player.current_chat() {
            player.send_message(msg.clone());
        } else if voice != VoiceLevel::Shout {
            player.send_message(ServerMessage::Warning {
                message: NO_ONE_CAN_HEAR.to_string(),
            });
            return Ok(());
        }

        if voice == VoiceLevel::Shout {
            return self.send_message(msg, Some(sender), Scope::Extended);
        }
        if chat.is_default() {
            return self.send_message(msg, Some(sender), Scope::Local);
        }

        player.set_is_chat_member(true);
        let list = player
            .chat_list()
            .ok_or_else(|| ChatError::NoChatList(sender.clone()))?;
        for member in list.members(chat)? {
            if &member == sender {
                continue;
            }
            let Some(p) = self.get_player(&member) else {
                continue;
            };
            if voice == VoiceLevel::Whisper && !p.is_chat_member() {
                continue;
            }
            p.send_message(msg.clone());
        }
        Ok(())
    }
}
