//! Chat membership for Roomcast.
//!
//! Every player is implicitly in [`DEFAULT_CHAT`](roomcast_protocol::DEFAULT_CHAT),
//! the channel of the room they stand in. On top of that, players can create
//! named chat rooms; those live in a [`ChatList`] that is shared by reference
//! among the players of a room cluster.
//!
//! # Key types
//!
//! - [`ChatList`]: cheap-to-clone shared handle to a cluster's chat rooms
//! - [`ChatRoom`]: one named channel and its members
//! - [`ChatConfig`]: size limits for names and messages, plus the room cap
//!
//! This crate only keeps the books. Announcing changes to players is the
//! router's job.

mod config;
mod error;
mod list;
mod room;

pub use config::ChatConfig;
pub use error::ChatError;
pub use list::{ChatList, MemberRemoval};
pub use room::{ChatRoom, ChatRoomInfo, next_chat_key};
