//! World layout configuration.

use roomcast_protocol::{LinkId, Location, RoomId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WorldConfig
// ---------------------------------------------------------------------------

/// The layout the persistence layer hands to [`World::build`](crate::World::build).
///
/// This is plain data: rooms, the links between them, and the tile maps.
/// Validation happens when the graph is built, not when the config is
/// deserialized.
///
/// The `with_*` helpers make small layouts easy to write by hand:
///
/// ```
/// use roomcast_protocol::{LinkId, Location, RoomId};
/// use roomcast_router::WorldConfig;
///
/// let hall = Location::room(1, 1, 1, 1, RoomId(1));
/// let cellar = Location::room(1, 1, 1, 1, RoomId(2));
/// let config = WorldConfig::new()
///     .with_room(hall, "Hall")
///     .with_room(cellar, "Cellar")
///     .with_door(LinkId(1), RoomId(1), RoomId(2), false);
/// assert_eq!(config.links.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub rooms: Vec<RoomSpec>,
    pub links: Vec<LinkSpec>,
    pub tile_maps: Vec<Location>,
}

/// One room. Its id is the room id of its location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub location: Location,
    #[serde(default)]
    pub name: String,
}

/// An undirected link between two rooms, with an optional door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub link_id: LinkId,
    pub room1: RoomId,
    pub room2: RoomId,
    #[serde(default)]
    pub door: Option<DoorSpec>,
}

/// Initial state of a door.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorSpec {
    pub has_lock: bool,
    pub opened: bool,
}

impl WorldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_room(mut self, location: Location, name: impl Into<String>) -> Self {
        self.rooms.push(RoomSpec {
            location,
            name: name.into(),
        });
        self
    }

    /// Adds a doorless link.
    pub fn with_link(mut self, link_id: LinkId, room1: RoomId, room2: RoomId) -> Self {
        self.links.push(LinkSpec {
            link_id,
            room1,
            room2,
            door: None,
        });
        self
    }

    /// Adds a link with an unlocked door.
    pub fn with_door(
        mut self,
        link_id: LinkId,
        room1: RoomId,
        room2: RoomId,
        opened: bool,
    ) -> Self {
        self.links.push(LinkSpec {
            link_id,
            room1,
            room2,
            door: Some(DoorSpec {
                has_lock: false,
                opened,
            }),
        });
        self
    }

    pub fn with_tile_map(mut self, location: Location) -> Self {
        self.tile_maps.push(location);
        self
    }
}
