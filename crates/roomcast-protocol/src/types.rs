//! Identity and fan-out types.
//!
//! These are the small value types that show up in every map key and
//! every outbound message.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The globally unique, stable identity of a player.
///
/// Primary keys are issued by the account layer (outside Roomcast) and are
/// opaque strings here. A player's key never changes while they are logged
/// in, which is what lets routers use it as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerKey(pub String);

impl PlayerKey {
    /// Wraps anything string-like as a player key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A room identifier, unique inside its interior map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// Identifier of a link between two rooms (and of the door it may carry).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LinkId(pub u32);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L-{}", self.0)
    }
}

/// Key of a chat room.
///
/// Keys are server-generated and displayed as `chat-N`. The key `chat-0`
/// is reserved for [`DEFAULT_CHAT`], the channel every player in a room
/// belongs to implicitly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChatKey(pub u64);

/// The implicit chat channel of every room.
pub const DEFAULT_CHAT: ChatKey = ChatKey(0);

impl ChatKey {
    /// Returns `true` for the implicit per-room channel.
    pub fn is_default(&self) -> bool {
        *self == DEFAULT_CHAT
    }
}

impl fmt::Display for ChatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat-{}", self.0)
    }
}

impl FromStr for ChatKey {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("chat-")
            .and_then(|n| n.parse().ok())
            .map(ChatKey)
            .ok_or_else(|| ProtocolError::InvalidChatKey(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Scope: which groups receive a batch of messages
// ---------------------------------------------------------------------------

/// Fan-out scope of an outbound batch.
///
/// A router owns one local group (the players physically in its location)
/// and may know a set of near groups (rooms one link away). Every broadcast
/// picks one of these scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Scope {
    /// Players of this location only.
    #[default]
    Local,

    /// Players of this location and of every near location (the "2-ring").
    Extended,

    /// Players of the near locations only. Used when the local group has
    /// already been informed through another path.
    Near,
}

impl Scope {
    /// Returns `true` if the local group is part of this scope.
    pub fn includes_local(&self) -> bool {
        !matches!(self, Self::Near)
    }

    /// Returns `true` if near groups are part of this scope.
    pub fn includes_near(&self) -> bool {
        !matches!(self, Self::Local)
    }
}

/// How loudly a player speaks. Shouting carries to near rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VoiceLevel {
    Whisper,
    #[default]
    Normal,
    Shout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_key_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerKey::new("alice-17")).unwrap();
        assert_eq!(json, "\"alice-17\"");
    }

    #[test]
    fn test_player_key_display_is_raw_key() {
        assert_eq!(PlayerKey::new("bob").to_string(), "bob");
    }

    #[test]
    fn test_room_id_display() {
        assert_eq!(RoomId(3).to_string(), "R-3");
    }

    #[test]
    fn test_link_id_display() {
        assert_eq!(LinkId(12).to_string(), "L-12");
    }

    #[test]
    fn test_chat_key_default_is_chat_zero() {
        assert_eq!(DEFAULT_CHAT.to_string(), "chat-0");
        assert!(DEFAULT_CHAT.is_default());
        assert!(!ChatKey(4).is_default());
    }

    #[test]
    fn test_chat_key_parses_display_form() {
        let key: ChatKey = "chat-42".parse().unwrap();
        assert_eq!(key, ChatKey(42));
    }

    #[test]
    fn test_chat_key_rejects_malformed_input() {
        assert!("chat-".parse::<ChatKey>().is_err());
        assert!("room-3".parse::<ChatKey>().is_err());
        assert!("chat-x".parse::<ChatKey>().is_err());
    }

    #[test]
    fn test_scope_membership() {
        assert!(Scope::Local.includes_local());
        assert!(!Scope::Local.includes_near());
        assert!(Scope::Extended.includes_local());
        assert!(Scope::Extended.includes_near());
        assert!(!Scope::Near.includes_local());
        assert!(Scope::Near.includes_near());
    }

    #[test]
    fn test_scope_default_is_local() {
        assert_eq!(Scope::default(), Scope::Local);
    }
}
