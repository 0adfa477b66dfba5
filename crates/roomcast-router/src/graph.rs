//! The room graph: rooms, the links between them, and their doors.
//!
//! The graph is built once from a [`WorldConfig`] and never changes shape
//! afterwards. The only runtime-mutable part is a door's open flag, which
//! is an atomic so the graph can be shared without a lock.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use roomcast_protocol::{DoorSnapshot, LinkId, Location, LocationKind, RoomId};

use crate::{RouterError, WorldConfig};

// ---------------------------------------------------------------------------
// Door / RoomLink
// ---------------------------------------------------------------------------

/// A door on a link.
#[derive(Debug)]
pub struct Door {
    has_lock: bool,
    opened: AtomicBool,
}

impl Door {
    pub fn new(has_lock: bool, opened: bool) -> Self {
        Self {
            has_lock,
            opened: AtomicBool::new(opened),
        }
    }

    pub fn has_lock(&self) -> bool {
        self.has_lock
    }

    pub fn is_opened(&self) -> bool {
        self.opened.load(Ordering::Acquire)
    }

    /// Sets the door state and returns the previous one.
    pub fn set_opened(&self, opened: bool) -> bool {
        self.opened.swap(opened, Ordering::AcqRel)
    }
}

/// An undirected edge between two rooms. Both rooms hold the same
/// `Arc<RoomLink>`, so they see the same door.
#[derive(Debug)]
pub struct RoomLink {
    id: LinkId,
    room1: RoomId,
    room2: RoomId,
    door: Option<Door>,
}

impl RoomLink {
    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn room1(&self) -> RoomId {
        self.room1
    }

    pub fn room2(&self) -> RoomId {
        self.room2
    }

    pub fn door(&self) -> Option<&Door> {
        self.door.as_ref()
    }

    /// The room at the other end, or `None` if `room` is not an endpoint.
    pub fn other_end(&self, room: RoomId) -> Option<RoomId> {
        if room == self.room1 {
            Some(self.room2)
        } else if room == self.room2 {
            Some(self.room1)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A node of the graph.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    location: Location,
    name: String,
    links: Vec<Arc<RoomLink>>,
}

impl Room {
    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Links in the order they were declared.
    pub fn links(&self) -> &[Arc<RoomLink>] {
        &self.links
    }

    pub fn link(&self, id: LinkId) -> Option<&Arc<RoomLink>> {
        self.links.iter().find(|link| link.id == id)
    }

    /// State of every door on this room's links.
    pub fn doors_state(&self) -> Vec<DoorSnapshot> {
        self.links
            .iter()
            .filter_map(|link| {
                link.door().map(|door| DoorSnapshot {
                    link_id: link.id,
                    is_opened: door.is_opened(),
                })
            })
            .collect()
    }

    /// Distinct rooms one link away, in link order, never `self`.
    ///
    /// Several links to the same room yield it once; a link that loops back
    /// to this room yields nothing.
    pub fn neighbor_ids(&self) -> Vec<RoomId> {
        let mut out: Vec<RoomId> = Vec::with_capacity(self.links.len());
        for link in &self.links {
            let Some(other) = link.other_end(self.id) else {
                continue;
            };
            if other != self.id && !out.contains(&other) {
                out.push(other);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// RoomGraph
// ---------------------------------------------------------------------------

/// All rooms of a world, keyed by id.
#[derive(Debug, Default)]
pub struct RoomGraph {
    rooms: BTreeMap<RoomId, Arc<Room>>,
}

impl RoomGraph {
    /// Builds the graph from its configuration.
    ///
    /// # Errors
    /// - [`RouterError::WrongLocationKind`] if a room's location is not a room
    /// - [`RouterError::DuplicateRoom`] if two rooms share an id
    /// - [`RouterError::RoomNotFound`] if a link names an unknown room
    pub fn from_config(config: &WorldConfig) -> Result<Self, RouterError> {
        let mut specs = BTreeMap::new();
        for spec in &config.rooms {
            let id = spec
                .location
                .room_id()
                .ok_or(RouterError::WrongLocationKind {
                    location: spec.location,
                    expected: LocationKind::Room,
                })?;
            if specs.insert(id, spec).is_some() {
                return Err(RouterError::DuplicateRoom(id));
            }
        }

        let mut links: BTreeMap<RoomId, Vec<Arc<RoomLink>>> = BTreeMap::new();
        for spec in &config.links {
            for end in [spec.room1, spec.room2] {
                if !specs.contains_key(&end) {
                    return Err(RouterError::RoomNotFound(end));
                }
            }
            let link = Arc::new(RoomLink {
                id: spec.link_id,
                room1: spec.room1,
                room2: spec.room2,
                door: spec.door.map(|d| Door::new(d.has_lock, d.opened)),
            });
            links.entry(spec.room1).or_default().push(Arc::clone(&link));
            if spec.room2 != spec.room1 {
                links.entry(spec.room2).or_default().push(link);
            }
        }

        let rooms = specs
            .into_iter()
            .map(|(id, spec)| {
                let room = Room {
                    id,
                    location: spec.location,
                    name: spec.name.clone(),
                    links: links.remove(&id).unwrap_or_default(),
                };
                (id, Arc::new(room))
            })
            .collect();

        Ok(Self { rooms })
    }

    pub fn room(&self, id: RoomId) -> Option<&Arc<Room>> {
        self.rooms.get(&id)
    }

    /// Looks a room up by its full location.
    pub fn room_at(&self, location: &Location) -> Option<&Arc<Room>> {
        let id = location.room_id()?;
        self.rooms
            .get(&id)
            .filter(|room| room.location == *location)
    }

    /// Rooms in id order.
    pub fn rooms(&self) -> impl Iterator<Item = &Arc<Room>> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: u32) -> Location {
        Location::room(1, 1, 1, 1, RoomId(id))
    }

    fn graph(config: WorldConfig) -> RoomGraph {
        RoomGraph::from_config(&config).unwrap()
    }

    #[test]
    fn test_neighbor_ids_dedups_parallel_links() {
        let g = graph(
            WorldConfig::new()
                .with_room(loc(1), "a")
                .with_room(loc(2), "b")
                .with_room(loc(3), "c")
                .with_link(LinkId(1), RoomId(1), RoomId(2))
                .with_door(LinkId(2), RoomId(2), RoomId(1), false)
                .with_link(LinkId(3), RoomId(3), RoomId(1)),
        );

        let room = g.room(RoomId(1)).unwrap();

        assert_eq!(room.links().len(), 3);
        assert_eq!(room.neighbor_ids(), vec![RoomId(2), RoomId(3)]);
    }

    #[test]
    fn test_neighbor_ids_ignores_self_loop() {
        let g = graph(
            WorldConfig::new()
                .with_room(loc(1), "a")
                .with_link(LinkId(1), RoomId(1), RoomId(1)),
        );
        assert!(g.room(RoomId(1)).unwrap().neighbor_ids().is_empty());
    }

    #[test]
    fn test_door_is_shared_by_both_ends() {
        let g = graph(
            WorldConfig::new()
                .with_room(loc(1), "a")
                .with_room(loc(2), "b")
                .with_door(LinkId(9), RoomId(1), RoomId(2), false),
        );

        let from_a = g.room(RoomId(1)).unwrap().link(LinkId(9)).unwrap();
        from_a.door().unwrap().set_opened(true);

        let b = g.room(RoomId(2)).unwrap();
        assert_eq!(
            b.doors_state(),
            vec![DoorSnapshot {
                link_id: LinkId(9),
                is_opened: true
            }]
        );
    }

    #[test]
    fn test_doors_state_skips_doorless_links() {
        let g = graph(
            WorldConfig::new()
                .with_room(loc(1), "a")
                .with_room(loc(2), "b")
                .with_link(LinkId(1), RoomId(1), RoomId(2)),
        );
        assert!(g.room(RoomId(1)).unwrap().doors_state().is_empty());
    }

    #[test]
    fn test_other_end_unknown_room_is_none() {
        let g = graph(
            WorldConfig::new()
                .with_room(loc(1), "a")
                .with_room(loc(2), "b")
                .with_link(LinkId(1), RoomId(1), RoomId(2)),
        );
        let link = g.room(RoomId(1)).unwrap().link(LinkId(1)).unwrap();
        assert_eq!(link.other_end(RoomId(1)), Some(RoomId(2)));
        assert_eq!(link.other_end(RoomId(7)), None);
    }

    #[test]
    fn test_from_config_duplicate_room_returns_error() {
        let config = WorldConfig::new().with_room(loc(1), "a").with_room(loc(1), "b");
        assert!(matches!(
            RoomGraph::from_config(&config),
            Err(RouterError::DuplicateRoom(RoomId(1)))
        ));
    }

    #[test]
    fn test_from_config_link_to_unknown_room_returns_error() {
        let config = WorldConfig::new()
            .with_room(loc(1), "a")
            .with_link(LinkId(1), RoomId(1), RoomId(5));
        assert!(matches!(
            RoomGraph::from_config(&config),
            Err(RouterError::RoomNotFound(RoomId(5)))
        ));
    }

    #[test]
    fn test_from_config_town_location_rejected() {
        let config = WorldConfig::new().with_room(Location::town(1, 1), "square");
        assert!(matches!(
            RoomGraph::from_config(&config),
            Err(RouterError::WrongLocationKind { .. })
        ));
    }

    #[test]
    fn test_room_at_requires_exact_location() {
        let g = graph(WorldConfig::new().with_room(loc(1), "a"));
        assert!(g.room_at(&loc(1)).is_some());
        assert!(g.room_at(&Location::room(1, 2, 1, 1, RoomId(1))).is_none());
    }
}
