//! Error types for the session layer.

use roomcast_protocol::PlayerKey;

/// Errors that can occur while attaching or detaching a player's client.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The player has no live client to detach.
    #[error("player {0} is not connected")]
    NotConnected(PlayerKey),

    /// The player already has a live client. A player holds at most one
    /// outbound queue at a time.
    #[error("player {0} is already connected")]
    AlreadyConnected(PlayerKey),
}
