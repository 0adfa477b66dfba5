//! Spatial message routing for Roomcast.
//!
//! Every room of the world gets a router that owns the players standing in
//! it. When something happens (a player arrives, leaves, walks through a
//! door, speaks) the router decides who must hear about it: the room itself,
//! the rooms one link away, or both. Nobody further away is told.
//!
//! # Key types
//!
//! - [`MessageRouter`]: the contract every router implements
//! - [`MultiGroupRouter`]: a room router that also reaches its near rooms
//! - [`TileMapRouter`]: a router for a flat tile map with no neighbors
//! - [`ChatRouting`]: named chat rooms and speech, for any router
//! - [`World`]: builds the graph and all routers from a [`WorldConfig`]
//!
//! # Invariants
//!
//! A player's key is in at most one router's local group at any time.
//! Moves swap membership under both routers' locks, taken in ascending
//! [`Location`](roomcast_protocol::Location) order, so concurrent moves in
//! opposite directions cannot deadlock.

mod chat;
mod config;
mod error;
mod graph;
mod multigroup;
mod router;
mod tilemap;
mod world;

pub use chat::{ChatRouting, NO_ONE_CAN_HEAR};
pub use config::{DoorSpec, LinkSpec, RoomSpec, WorldConfig};
pub use error::RouterError;
pub use graph::{Door, Room, RoomGraph, RoomLink};
pub use multigroup::MultiGroupRouter;
pub use router::{LocalGroup, MessageRouter};
pub use tilemap::TileMapRouter;
pub use world::World;
