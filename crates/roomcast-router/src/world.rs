//! The world arena: every router of a world, built and wired in one step.

use std::collections::HashMap;
use std::sync::Arc;

use roomcast_chat::ChatConfig;
use roomcast_protocol::{Location, PlayerKey, RoomId};

use crate::{MessageRouter, MultiGroupRouter, RoomGraph, RouterError, TileMapRouter, WorldConfig};

/// Owns the room graph and one router per room and per tile map.
///
/// Routers are created and initialized by [`build`](Self::build) and live
/// as long as the world. Near-room handles between routers are weak, so
/// dropping the world frees everything.
#[derive(Debug)]
pub struct World {
    graph: RoomGraph,
    rooms: HashMap<RoomId, Arc<MultiGroupRouter>>,
    tile_maps: HashMap<Location, Arc<TileMapRouter>>,
}

impl World {
    /// Builds the graph and every router, then initializes the room
    /// routers' near lists.
    ///
    /// # Errors
    /// Any graph validation error, or [`RouterError::DuplicateLocation`] /
    /// [`RouterError::WrongLocationKind`] for a bad tile map entry.
    pub fn build(config: &WorldConfig, chat_config: ChatConfig) -> Result<Self, RouterError> {
        let graph = RoomGraph::from_config(config)?;

        let rooms: HashMap<RoomId, Arc<MultiGroupRouter>> = graph
            .rooms()
            .map(|room| {
                let router = MultiGroupRouter::new(Arc::clone(room), chat_config.clone());
                (room.id(), Arc::new(router))
            })
            .collect();
        for router in rooms.values() {
            router.init(&rooms)?;
        }

        let mut tile_maps = HashMap::new();
        for &location in &config.tile_maps {
            let router = TileMapRouter::new(location, chat_config.clone())?;
            if tile_maps.insert(location, Arc::new(router)).is_some() {
                return Err(RouterError::DuplicateLocation(location));
            }
        }

        tracing::info!(
            rooms = rooms.len(),
            tile_maps = tile_maps.len(),
            "world built"
        );
        Ok(Self {
            graph,
            rooms,
            tile_maps,
        })
    }

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    /// The router of any routable location.
    pub fn router(&self, location: &Location) -> Option<Arc<dyn MessageRouter>> {
        if location.is_tile_map() {
            return self
                .tile_maps
                .get(location)
                .map(|r| Arc::clone(r) as Arc<dyn MessageRouter>);
        }
        self.room_router(location)
            .map(|r| r as Arc<dyn MessageRouter>)
    }

    pub fn room_router(&self, location: &Location) -> Option<Arc<MultiGroupRouter>> {
        let room = self.graph.room_at(location)?;
        self.rooms.get(&room.id()).cloned()
    }

    pub fn tile_map_router(&self, location: &Location) -> Option<Arc<TileMapRouter>> {
        self.tile_maps.get(location).cloned()
    }

    /// Every location whose local group holds `key`. Never more than one
    /// entry while the routing invariant holds.
    pub fn holders(&self, key: &PlayerKey) -> Vec<Location> {
        let rooms = self.rooms.values().map(|r| r.group());
        let maps = self.tile_maps.values().map(|r| r.group());
        let mut out: Vec<Location> = rooms
            .chain(maps)
            .filter(|group| group.contains(key))
            .map(|group| group.location())
            .collect();
        out.sort();
        out
    }

    /// Clears every router without notifications. Returns how many
    /// players were dropped.
    pub fn teardown(&self) -> usize {
        let rooms = self.rooms.values().map(|r| r.remove_all_players());
        let maps = self.tile_maps.values().map(|r| r.remove_all_players());
        let count: usize = rooms.chain(maps).sum();
        tracing::info!(players = count, "world torn down");
        count
    }
}
