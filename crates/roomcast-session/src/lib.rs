//! Player handles for Roomcast.
//!
//! A [`Player`] is the router's view of a logged-in character:
//!
//! 1. **Identity**: a stable [`PlayerKey`](roomcast_protocol::PlayerKey)
//! 2. **Position**: the [`Location`](roomcast_protocol::Location) of the
//!    router that currently holds the player
//! 3. **Connection**: an optional outbound queue, present while a client is
//!    attached
//! 4. **Chat affiliation**: the current chat room and the shared
//!    [`ChatList`](roomcast_chat::ChatList) of the player's cluster
//!
//! # How it fits in the stack
//!
//! ```text
//! Router Layer (above)  ← holds Arc<Player> in per-location maps
//!     ↕
//! Session Layer (this crate)  ← per-player mutable state and outbound queue
//!     ↕
//! Protocol / Chat (below)  ← PlayerKey, ServerMessage, ChatList
//! ```
//!
//! The router never owns a player's lifecycle, only its membership. Players
//! are created on login, shared as `Arc<Player>`, and dropped by the login
//! layer on logout.

mod error;
mod player;

pub use error::SessionError;
pub use player::{ConnectionState, Player, PlayerReceiver, PlayerSender};
