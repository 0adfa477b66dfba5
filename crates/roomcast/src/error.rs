//! Unified error type for the Roomcast crates.

use roomcast_chat::ChatError;
use roomcast_protocol::ProtocolError;
use roomcast_router::RouterError;
use roomcast_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoomcastError {
    /// A location or chat key failed to parse.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A player's client was not in the expected state.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A chat operation was refused.
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// A routing operation was refused or the world is malformed.
    #[error(transparent)]
    Router(#[from] RouterError),
}

#[cfg(test)]
mod tests {
    use roomcast_protocol::{ChatKey, Location, PlayerKey, RoomId};

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err: RoomcastError = ProtocolError::InvalidLocation("nowhere".into()).into();
        assert!(matches!(err, RoomcastError::Protocol(_)));
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_from_session_error() {
        let err: RoomcastError = SessionError::NotConnected(PlayerKey::new("ann")).into();
        assert!(matches!(err, RoomcastError::Session(_)));
        assert!(err.to_string().contains("ann"));
    }

    #[test]
    fn test_from_chat_error() {
        let err: RoomcastError = ChatError::NotFound(ChatKey(3)).into();
        assert!(matches!(err, RoomcastError::Chat(_)));
    }

    #[test]
    fn test_from_router_error() {
        let here = Location::room(1, 1, 1, 1, RoomId(1));
        let err: RoomcastError = RouterError::NotInitialized(here).into();
        assert!(matches!(err, RoomcastError::Router(_)));
    }
}
