//! Shared vocabulary for Roomcast.
//!
//! This crate defines the types every other layer speaks:
//!
//! - **Identity** ([`PlayerKey`], [`RoomId`], [`LinkId`], [`ChatKey`]):
//!   stable keys used in maps and messages.
//! - **Addressing** ([`Location`]): the hierarchical address of a place in
//!   the universe, used as the routing-domain selector.
//! - **Messages** ([`ServerMessage`]): the already-constructed outbound
//!   messages the router pushes onto player queues.
//! - **Fan-out** ([`Scope`], [`VoiceLevel`]): who should hear an event.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about locks, rooms, or connections.
//! Payloads derive `Serialize`/`Deserialize` so the transport collaborator
//! can encode them however it likes; Roomcast itself never encodes.
//!
//! ```text
//! Router (fan-out) → Protocol (ServerMessage) → Transport (bytes, external)
//! ```

mod error;
mod location;
mod message;
mod types;

pub use error::ProtocolError;
pub use location::{Location, LocationKind};
pub use message::{DoorSnapshot, PlayerSummary, ServerMessage};
pub use types::{ChatKey, DEFAULT_CHAT, LinkId, PlayerKey, RoomId, Scope, VoiceLevel};
