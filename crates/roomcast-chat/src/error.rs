//! Error types for the chat layer.

use roomcast_protocol::{ChatKey, PlayerKey};

/// Errors that can occur while updating chat membership.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// No chat room with this key exists in the list.
    #[error("chat room {0} not found")]
    NotFound(ChatKey),

    /// A chat room with this key is already registered.
    #[error("chat room {0} already exists")]
    AlreadyExists(ChatKey),

    /// The player is not a member of the chat room.
    #[error("player {0} is not a member of {1}")]
    NotMember(PlayerKey, ChatKey),

    /// The cluster already holds the maximum number of chat rooms.
    #[error("too many chat rooms (limit {0})")]
    TooManyRooms(usize),

    /// The player has no chat list, so named chat rooms are unreachable.
    #[error("player {0} has no chat list")]
    NoChatList(PlayerKey),

    /// The default chat room cannot be joined, left, or deleted explicitly.
    #[error("operation not allowed on the default chat room")]
    DefaultChat,
}
