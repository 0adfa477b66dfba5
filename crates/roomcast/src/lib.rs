//! # Roomcast
//!
//! Spatial message routing for multiplayer room worlds.
//!
//! A world is a graph of rooms joined by links, some of which carry doors.
//! Each room has a [`MultiGroupRouter`] that knows the players standing in
//! it and the rooms one link away. Events raised in a room are fanned out to
//! the room itself, its neighbors, or both, and players moving between
//! adjacent rooms are handed over atomically. Flat tile maps get a
//! [`TileMapRouter`] with no neighbors.
//!
//! Chat rides on the same routers: every room cluster shares a
//! [`ChatList`] of named chat rooms next to the implicit default chat.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomcast::prelude::*;
//!
//! # fn main() -> Result<(), RoomcastError> {
//! let hall = Location::room(1, 1, 1, 1, RoomId(1));
//! let cellar = Location::room(1, 1, 1, 1, RoomId(2));
//! let config = WorldConfig::new()
//!     .with_room(hall, "hall")
//!     .with_room(cellar, "cellar")
//!     .with_door(LinkId(1), RoomId(1), RoomId(2), false);
//! let world = World::build(&config, ChatConfig::default())?;
//!
//! let (ann, _outbound) = Player::with_channel(PlayerKey::new("ann"), "Ann", hall);
//! let router = world.router(&hall).ok_or(RouterError::RoomNotFound(RoomId(1)))?;
//! router.add_player(&ann)?;
//! router.move_player(&ann, cellar)?;
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::RoomcastError;

pub use roomcast_chat as chat;
pub use roomcast_protocol as protocol;
pub use roomcast_router as router;
pub use roomcast_session as session;

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `default_filter` when the variable is unset or invalid.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::debug!("tracing initialized");
    }
}

/// Everything needed to build a world and route players through it.
pub mod prelude {
    pub use crate::RoomcastError;
    pub use roomcast_chat::{ChatConfig, ChatError, ChatList};
    pub use roomcast_protocol::{
        ChatKey, DEFAULT_CHAT, LinkId, Location, LocationKind, PlayerKey, PlayerSummary, RoomId,
        Scope, ServerMessage, VoiceLevel,
    };
    pub use roomcast_router::{
        ChatRouting, MessageRouter, MultiGroupRouter, RouterError, TileMapRouter, World,
        WorldConfig,
    };
    pub use roomcast_session::{Player, PlayerReceiver, PlayerSender, SessionError};
}
