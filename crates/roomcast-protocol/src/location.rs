//! Hierarchical addresses in the universe.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, RoomId};

/// Which kind of place a [`Location`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    World,
    Town,
    Room,
    TileMap,
}

/// An immutable address: world → town → building → interior map → room,
/// or world → tile map.
///
/// Locations are compared structurally and are used as map keys wherever a
/// routing domain must be addressed. They are also totally ordered; the
/// router relies on that order to lock two rooms without deadlocking.
///
/// Only the constructors can build a location, so exactly one of
/// [`is_world`](Self::is_world), [`is_town`](Self::is_town),
/// [`is_room`](Self::is_room) and [`is_tile_map`](Self::is_tile_map) holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Location {
    world: u32,
    town: Option<u32>,
    building: Option<u32>,
    interior_map: Option<u32>,
    room: Option<RoomId>,
    tile_map: Option<u32>,
}

impl Location {
    /// A world map.
    pub fn world(world: u32) -> Self {
        Self {
            world,
            town: None,
            building: None,
            interior_map: None,
            room: None,
            tile_map: None,
        }
    }

    /// A town map inside a world.
    pub fn town(world: u32, town: u32) -> Self {
        Self {
            town: Some(town),
            ..Self::world(world)
        }
    }

    /// A room inside a building's interior map.
    pub fn room(
        world: u32,
        town: u32,
        building: u32,
        interior_map: u32,
        room: RoomId,
    ) -> Self {
        Self {
            world,
            town: Some(town),
            building: Some(building),
            interior_map: Some(interior_map),
            room: Some(room),
            tile_map: None,
        }
    }

    /// A flat tile map inside a world.
    pub fn tile_map(world: u32, tile_map: u32) -> Self {
        Self {
            tile_map: Some(tile_map),
            ..Self::world(world)
        }
    }

    pub fn kind(&self) -> LocationKind {
        if self.tile_map.is_some() {
            LocationKind::TileMap
        } else if self.building.is_some() {
            LocationKind::Room
        } else if self.town.is_some() {
            LocationKind::Town
        } else {
            LocationKind::World
        }
    }

    pub fn is_world(&self) -> bool {
        self.kind() == LocationKind::World
    }

    pub fn is_town(&self) -> bool {
        self.kind() == LocationKind::Town
    }

    pub fn is_room(&self) -> bool {
        self.kind() == LocationKind::Room
    }

    pub fn is_tile_map(&self) -> bool {
        self.kind() == LocationKind::TileMap
    }

    pub fn world_id(&self) -> u32 {
        self.world
    }

    pub fn town_id(&self) -> Option<u32> {
        self.town
    }

    pub fn building_id(&self) -> Option<u32> {
        self.building
    }

    pub fn interior_map_id(&self) -> Option<u32> {
        self.interior_map
    }

    /// The room id, for room locations only.
    pub fn room_id(&self) -> Option<RoomId> {
        self.room
    }

    pub fn tile_map_id(&self) -> Option<u32> {
        self.tile_map
    }
}

/// Space-separated ids, outermost first: `"1"`, `"1 2"`, `"1 2 3 4 5"`,
/// or `"1 t7"` for tile map 7 of world 1.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.world)?;
        if let Some(tile_map) = self.tile_map {
            return write!(f, " t{tile_map}");
        }
        if let Some(town) = self.town {
            write!(f, " {town}")?;
        }
        if let (Some(building), Some(interior), Some(room)) =
            (self.building, self.interior_map, self.room)
        {
            write!(f, " {building} {interior} {}", room.0)?;
        }
        Ok(())
    }
}

impl FromStr for Location {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidLocation(s.to_string());
        let parts: Vec<&str> = s.split_whitespace().collect();
        let num = |p: &str| p.parse::<u32>().map_err(|_| invalid());

        match parts.as_slice() {
            [world] => Ok(Self::world(num(world)?)),
            [world, tile] if tile.starts_with('t') => {
                Ok(Self::tile_map(num(world)?, num(&tile[1..])?))
            }
            [world, town] => Ok(Self::town(num(world)?, num(town)?)),
            [world, town, building, interior, room] => Ok(Self::room(
                num(world)?,
                num(town)?,
                num(building)?,
                num(interior)?,
                RoomId(num(room)?),
            )),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates_are_exclusive() {
        let all = [
            Location::world(1),
            Location::town(1, 2),
            Location::room(1, 2, 3, 4, RoomId(5)),
            Location::tile_map(1, 7),
        ];
        for loc in all {
            let holds = [loc.is_world(), loc.is_town(), loc.is_room(), loc.is_tile_map()]
                .iter()
                .filter(|b| **b)
                .count();
            assert_eq!(holds, 1, "exactly one kind must hold for {loc}");
        }
    }

    #[test]
    fn test_room_location_exposes_room_id() {
        let loc = Location::room(0, 1, 2, 0, RoomId(9));
        assert_eq!(loc.kind(), LocationKind::Room);
        assert_eq!(loc.room_id(), Some(RoomId(9)));
        assert_eq!(Location::town(0, 1).room_id(), None);
    }

    #[test]
    fn test_structural_equality() {
        let a = Location::room(0, 1, 2, 0, RoomId(9));
        let b = Location::room(0, 1, 2, 0, RoomId(9));
        let c = Location::room(0, 1, 2, 1, RoomId(9));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Location::world(1).to_string(), "1");
        assert_eq!(Location::town(1, 2).to_string(), "1 2");
        assert_eq!(
            Location::room(1, 2, 3, 4, RoomId(5)).to_string(),
            "1 2 3 4 5"
        );
        assert_eq!(Location::tile_map(1, 7).to_string(), "1 t7");
    }

    #[test]
    fn test_parse_accepts_every_display_form() {
        for loc in [
            Location::world(1),
            Location::town(1, 2),
            Location::room(1, 2, 3, 4, RoomId(5)),
            Location::tile_map(1, 7),
        ] {
            let parsed: Location = loc.to_string().parse().unwrap();
            assert_eq!(parsed, loc);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Location>().is_err());
        assert!("1 2 3".parse::<Location>().is_err());
        assert!("1 tx".parse::<Location>().is_err());
        assert!("one".parse::<Location>().is_err());
    }

    #[test]
    fn test_order_is_total_over_rooms() {
        let low = Location::room(0, 0, 0, 0, RoomId(1));
        let high = Location::room(0, 0, 0, 0, RoomId(2));
        assert!(low < high);
        assert!(high > low);
    }
}
