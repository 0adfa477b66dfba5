//! The player handle: the data structure that represents a logged-in
//! character to the router.
//!
//! A player tracks:
//! - WHO they are (`PlayerKey`, display name)
//! - WHERE they are (the `Location` of the router holding them)
//! - WHETHER a client is attached (an outbound queue, or none)
//! - WHICH chat room they talk in, and the cluster's shared `ChatList`
//!
//! Every field is behind its own small mutex. These are leaf locks: a
//! `Player` method never calls back into a router, so a router may call
//! them while holding its own map lock.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use roomcast_chat::ChatList;
use roomcast_protocol::{ChatKey, DEFAULT_CHAT, Location, PlayerKey, PlayerSummary, ServerMessage};
use tokio::sync::mpsc;

use crate::SessionError;

/// Channel sender for delivering outbound messages to a player's client.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Receiving end of a player's outbound queue, owned by the transport.
pub type PlayerReceiver = mpsc::UnboundedReceiver<ServerMessage>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// Whether a client is attached to the player.
///
/// ```text
///   Disconnected ──(connect)──→ Connected
///        ↑                         │
///        └──────(disconnect)───────┘
/// ```
///
/// A freshly created player starts `Disconnected { since: None }`: it can be
/// placed in the world before its client is ready to receive anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A client is attached and receives messages.
    Connected,

    /// No client. `since` is the moment the last client went away, or
    /// `None` if none was ever attached.
    Disconnected { since: Option<Instant> },
}

struct Connection {
    state: ConnectionState,
    sender: Option<PlayerSender>,
}

struct ChatState {
    chat_list: Option<ChatList>,
    current_chat: ChatKey,
    is_chat_member: bool,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A logged-in character, shared between routers as `Arc<Player>`.
pub struct Player {
    key: PlayerKey,
    name: String,
    location: Mutex<Location>,
    connection: Mutex<Connection>,
    chat: Mutex<ChatState>,
}

impl Player {
    /// Creates a player with no client attached, talking in the default
    /// chat room, with no chat list.
    pub fn new(key: PlayerKey, name: impl Into<String>, location: Location) -> Self {
        Self {
            key,
            name: name.into(),
            location: Mutex::new(location),
            connection: Mutex::new(Connection {
                state: ConnectionState::Disconnected { since: None },
                sender: None,
            }),
            chat: Mutex::new(ChatState {
                chat_list: None,
                current_chat: DEFAULT_CHAT,
                is_chat_member: false,
            }),
        }
    }

    /// Creates a connected player together with the receiving end of its
    /// outbound queue.
    pub fn with_channel(
        key: PlayerKey,
        name: impl Into<String>,
        location: Location,
    ) -> (Arc<Self>, PlayerReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let player = Self::new(key, name, location);
        {
            let mut conn = lock(&player.connection);
            conn.state = ConnectionState::Connected;
            conn.sender = Some(tx);
        }
        (Arc::new(player), rx)
    }

    pub fn key(&self) -> &PlayerKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Location {
        *lock(&self.location)
    }

    /// Records the location of the router that now holds the player.
    /// Only routers should call this.
    pub fn set_location(&self, location: Location) {
        *lock(&self.location) = location;
    }

    // -- Connection --

    /// Attaches a client's outbound queue.
    ///
    /// # Errors
    /// [`SessionError::AlreadyConnected`] if a client is already attached.
    pub fn connect(&self, sender: PlayerSender) -> Result<(), SessionError> {
        let mut conn = lock(&self.connection);
        if conn.state == ConnectionState::Connected {
            return Err(SessionError::AlreadyConnected(self.key.clone()));
        }
        conn.state = ConnectionState::Connected;
        conn.sender = Some(sender);
        tracing::info!(player = %self.key, "client attached");
        Ok(())
    }

    /// Detaches the client. Messages sent afterwards are dropped.
    ///
    /// # Errors
    /// [`SessionError::NotConnected`] if no client is attached.
    pub fn disconnect(&self) -> Result<(), SessionError> {
        let mut conn = lock(&self.connection);
        if conn.state != ConnectionState::Connected {
            return Err(SessionError::NotConnected(self.key.clone()));
        }
        conn.state = ConnectionState::Disconnected {
            since: Some(Instant::now()),
        };
        conn.sender = None;
        tracing::info!(player = %self.key, "client detached");
        Ok(())
    }

    pub fn connection_state(&self) -> ConnectionState {
        lock(&self.connection).state
    }

    /// `true` while a client is attached.
    pub fn is_connected_to_game(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Enqueues a message for the player's client. Never blocks.
    ///
    /// Silently drops the message if no client is attached or the
    /// transport already closed the receiving end.
    pub fn send_message(&self, msg: ServerMessage) {
        let conn = lock(&self.connection);
        if let Some(sender) = &conn.sender {
            if sender.send(msg).is_err() {
                tracing::trace!(player = %self.key, "outbound queue closed, message dropped");
            }
        }
    }

    // -- Chat affiliation --

    /// The shared chat list of the player's cluster, if they adopted one.
    pub fn chat_list(&self) -> Option<ChatList> {
        lock(&self.chat).chat_list.clone()
    }

    /// Replaces the chat list handle and returns the previous one.
    pub fn set_chat_list(&self, chat_list: Option<ChatList>) -> Option<ChatList> {
        std::mem::replace(&mut lock(&self.chat).chat_list, chat_list)
    }

    pub fn current_chat(&self) -> ChatKey {
        lock(&self.chat).current_chat
    }

    /// Switches the current chat room. Switching clears the
    /// [`is_chat_member`](Self::is_chat_member) flag.
    pub fn set_current_chat(&self, chat: ChatKey) {
        let mut state = lock(&self.chat);
        state.current_chat = chat;
        state.is_chat_member = false;
    }

    /// `true` once the player has spoken in their current named chat room.
    /// Whispers in a named room only reach members with this flag set.
    pub fn is_chat_member(&self) -> bool {
        lock(&self.chat).is_chat_member
    }

    pub fn set_is_chat_member(&self, member: bool) {
        lock(&self.chat).is_chat_member = member;
    }

    /// Public data shown to other clients.
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            key: self.key.clone(),
            name: self.name.clone(),
            location: self.location(),
            connected: self.is_connected_to_game(),
        }
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("key", &self.key)
            .field("location", &self.location())
            .field("state", &self.connection_state())
            .field("current_chat", &self.current_chat())
            .finish()
    }
}
