//! Outbound message kinds.
//!
//! The router decides *who* receives a message; these types say *what* they
//! receive. Payload shapes are deliberately small: a client needs just
//! enough to update its own scene and chat tabs.

use serde::{Deserialize, Serialize};

use crate::{ChatKey, LinkId, Location, PlayerKey, VoiceLevel};

/// The public data of a player, as other clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub key: PlayerKey,
    pub name: String,
    pub location: Location,
    /// `false` while the player is placed in the world without a client.
    pub connected: bool,
}

/// State of one door, as carried by [`ServerMessage::DoorsState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSnapshot {
    pub link_id: LinkId,
    pub is_opened: bool,
}

/// Every message the router can push onto a player's outbound queue.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON such as
/// `{ "type": "CleanGhosts", "player": "bob", "location": ... }` for
/// transports that choose JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    // -- Room membership --

    /// A player appeared in the recipient's 2-ring.
    AddPlayerToRoom { player: PlayerSummary },

    /// A player left `location` and is no longer visible to the recipient.
    RemovePlayerFromRoom { player: PlayerKey, location: Location },

    /// A player moved into `location`.
    LocationChange { player: PlayerKey, location: Location },

    /// Sent to a player who just moved: drop cached entities that are not
    /// visible from `location`.
    CleanGhosts { player: PlayerKey, location: Location },

    /// Snapshot of every door of a room.
    DoorsState {
        location: Location,
        doors: Vec<DoorSnapshot>,
    },

    /// Snapshot of the players of a room (the recipient excluded).
    RoomPlayerData {
        location: Location,
        players: Vec<PlayerSummary>,
    },

    /// A single door of `location` was opened or closed.
    DoorState {
        location: Location,
        link_id: LinkId,
        is_opened: bool,
    },

    /// A player's client connected or disconnected.
    PlayerConnectedToGame { player: PlayerKey, connected: bool },

    // -- Chat --

    /// A player joined a chat room.
    AddPlayerToChatRoom { player: PlayerKey, chat: ChatKey },

    /// A player left a chat room.
    RemPlayerFromChatRoom { player: PlayerKey, chat: ChatKey },

    /// A custom chat room exists in the recipient's cluster.
    ChatRoomCreated {
        chat: ChatKey,
        name: String,
        creator: PlayerKey,
    },

    /// A custom chat room was emptied and removed.
    ChatRoomDeleted { chat: ChatKey },

    /// The recipient's current chat room, with its member roster.
    SetCurrentChatRoom {
        chat: ChatKey,
        players: Vec<PlayerKey>,
    },

    /// A line of chat.
    ChatText {
        sender: PlayerKey,
        chat: ChatKey,
        voice: VoiceLevel,
        text: String,
    },

    /// A human-readable notice for the recipient only.
    Warning { message: String },
}

impl ServerMessage {
    /// Short name of the message kind, handy for logs and test assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddPlayerToRoom { .. } => "AddPlayerToRoom",
            Self::RemovePlayerFromRoom { .. } => "RemovePlayerFromRoom",
            Self::LocationChange { .. } => "LocationChange",
            Self::CleanGhosts { .. } => "CleanGhosts",
            Self::DoorsState { .. } => "DoorsState",
            Self::RoomPlayerData { .. } => "RoomPlayerData",
            Self::DoorState { .. } => "DoorState",
            Self::PlayerConnectedToGame { .. } => "PlayerConnectedToGame",
            Self::AddPlayerToChatRoom { .. } => "AddPlayerToChatRoom",
            Self::RemPlayerFromChatRoom { .. } => "RemPlayerFromChatRoom",
            Self::ChatRoomCreated { .. } => "ChatRoomCreated",
            Self::ChatRoomDeleted { .. } => "ChatRoomDeleted",
            Self::SetCurrentChatRoom { .. } => "SetCurrentChatRoom",
            Self::ChatText { .. } => "ChatText",
            Self::Warning { .. } => "Warning",
        }
    }
}
