//! Routing for rooms of a building's interior map.
//!
//! A [`MultiGroupRouter`] owns the players of one room (its local group)
//! and knows the routers of every room one link away (its near groups).
//! Events are announced to the *2-ring*, local plus near, so a player
//! always knows who stands in the rooms they could walk into, and nobody
//! further away hears about them.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──→ init(routers) ──→ add/remove/move ... ──→ remove_all_players()
//! ```
//!
//! `init` resolves the near groups once; until then membership operations
//! fail with [`RouterError::NotInitialized`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, MutexGuard, OnceLock, Weak};

use roomcast_chat::ChatConfig;
use roomcast_protocol::{LinkId, Location, PlayerKey, RoomId, Scope, ServerMessage};
use roomcast_session::Player;

use crate::chat::{join_cluster_chat, leave_cluster_chat};
use crate::graph::Room;
use crate::router::{LocalGroup, PlayerMap, deliver};
use crate::{MessageRouter, RouterError};

/// A room one link away, with a handle on its router.
#[derive(Debug)]
struct NearRoom {
    room: Arc<Room>,
    router: Weak<MultiGroupRouter>,
}

impl NearRoom {
    fn router(&self) -> Option<Arc<MultiGroupRouter>> {
        self.router.upgrade()
    }
}

/// Locks two groups in ascending location order and returns the guards in
/// argument order.
fn lock_pair<'a>(
    a: &'a LocalGroup,
    b: &'a LocalGroup,
) -> (MutexGuard<'a, PlayerMap>, MutexGuard<'a, PlayerMap>) {
    debug_assert_ne!(a.location(), b.location());
    if a.location() < b.location() {
        let ga = a.lock();
        let gb = b.lock();
        (ga, gb)
    } else {
        let gb = b.lock();
        let ga = a.lock();
        (ga, gb)
    }
}

/// The router of one room.
#[derive(Debug)]
pub struct MultiGroupRouter {
    room: Arc<Room>,
    group: LocalGroup,
    near: OnceLock<Vec<NearRoom>>,
    chat_config: ChatConfig,
}

impl MultiGroupRouter {
    pub fn new(room: Arc<Room>, chat_config: ChatConfig) -> Self {
        Self {
            group: LocalGroup::new(room.location()),
            room,
            near: OnceLock::new(),
            chat_config,
        }
    }

    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    pub fn is_initialized(&self) -> bool {
        self.near.get().is_some()
    }

    /// Resolves the routers of every room one link away.
    ///
    /// `routers` must hold the router of every neighbor of this room. The
    /// near list keeps link order, drops duplicates, and never includes
    /// this room.
    ///
    /// # Errors
    /// - [`RouterError::RoomNotFound`] if a neighbor has no router
    /// - [`RouterError::AlreadyInitialized`] on a second call
    pub fn init(&self, routers: &HashMap<RoomId, Arc<MultiGroupRouter>>) -> Result<(), RouterError> {
        if self.is_initialized() {
            return Err(RouterError::AlreadyInitialized(self.location()));
        }
        let near = self
            .room
            .neighbor_ids()
            .into_iter()
            .map(|id| {
                routers
                    .get(&id)
                    .map(|router| NearRoom {
                        room: Arc::clone(&router.room),
                        router: Arc::downgrade(router),
                    })
                    .ok_or(RouterError::RoomNotFound(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = near.len();
        self.near
            .set(near)
            .map_err(|_| RouterError::AlreadyInitialized(self.location()))?;
        tracing::debug!(location = %self.location(), near = count, "router initialized");
        Ok(())
    }

    fn near(&self) -> Result<&[NearRoom], RouterError> {
        self.near
            .get()
            .map(Vec::as_slice)
            .ok_or_else(|| {
                tracing::error!(location = %self.location(), "router used before init");
                RouterError::NotInitialized(self.location())
            })
    }

    /// Locations of the near rooms, in link order.
    pub fn near_locations(&self) -> Result<Vec<Location>, RouterError> {
        Ok(self.near()?.iter().map(|n| n.room.location()).collect())
    }

    fn near_routers(&self) -> Result<Vec<Arc<MultiGroupRouter>>, RouterError> {
        Ok(self.near()?.iter().filter_map(NearRoom::router).collect())
    }

    /// Doors and players of one room, as sent to a player who can now see
    /// into it.
    fn send_room_snapshot(player: &Player, router: &MultiGroupRouter) {
        let location = router.location();
        player.send_message(ServerMessage::DoorsState {
            location,
            doors: router.room.doors_state(),
        });
        player.send_message(ServerMessage::RoomPlayerData {
            location,
            players: router.group.summaries(Some(player.key())),
        });
    }

    /// Opens or closes the door on `link_id` and tells every room that can
    /// see either side of it.
    ///
    /// Each room of the union of both endpoints' 2-rings hears about it
    /// exactly once.
    ///
    /// # Errors
    /// - [`RouterError::PlayerNotFound`] if the player is not in this room
    /// - [`RouterError::DoorNotFound`] if this room has no such door
    pub fn set_door_state(
        &self,
        player: &Arc<Player>,
        link_id: LinkId,
        opened: bool,
    ) -> Result<(), RouterError> {
        let near = self.near()?;
        if !self.group.contains(player.key()) {
            return Err(RouterError::PlayerNotFound(
                player.key().clone(),
                self.location(),
            ));
        }
        let link = self
            .room
            .link(link_id)
            .ok_or(RouterError::DoorNotFound(link_id, self.location()))?;
        let door = link
            .door()
            .ok_or(RouterError::DoorNotFound(link_id, self.location()))?;

        let was_opened = door.set_opened(opened);
        tracing::info!(
            player = %player.key(),
            location = %self.location(),
            link = %link_id,
            was_opened,
            opened,
            "door state changed"
        );

        let mut recipients: BTreeMap<RoomId, Arc<MultiGroupRouter>> = BTreeMap::new();
        for router in self.near_routers()? {
            recipients.insert(router.room.id(), router);
        }
        let other = link
            .other_end(self.room.id())
            .and_then(|id| near.iter().find(|n| n.room.id() == id))
            .and_then(NearRoom::router);
        if let Some(other) = other {
            for router in other.near_routers()? {
                recipients.insert(router.room.id(), router);
            }
            recipients.insert(other.room.id(), other);
        }
        recipients.remove(&self.room.id());

        let msg = [ServerMessage::DoorState {
            location: self.location(),
            link_id,
            is_opened: opened,
        }];
        self.group.send(&msg, None);
        for router in recipients.values() {
            router.group.send(&msg, None);
        }
        Ok(())
    }
}

impl MessageRouter for MultiGroupRouter {
    fn group(&self) -> &LocalGroup {
        &self.group
    }

    fn chat_config(&self) -> &ChatConfig {
        &self.chat_config
    }

    fn add_player(&self, player: &Arc<Player>) -> Result<(), RouterError> {
        let near = self.near_routers()?;
        let key = player.key();
        let location = self.location();

        let announce = {
            let mut players = self.group.lock();
            players.insert(key.clone(), Arc::clone(player));
            player.set_location(location);
            if !player.is_connected_to_game() {
                tracing::debug!(player = %key, %location, "player placed");
                return Ok(());
            }
            let announce = [ServerMessage::AddPlayerToRoom {
                player: player.summary(),
            }];
            deliver(&players, &announce, Some(key));
            announce
        };
        tracing::info!(player = %key, %location, "player joined room");

        for router in &near {
            router.group.send(&announce, None);
        }

        Self::send_room_snapshot(player, self);
        for router in &near {
            Self::send_room_snapshot(player, router);
        }

        join_cluster_chat(self, player);
        Ok(())
    }

    fn remove_player(&self, player: &Arc<Player>) -> Result<(), RouterError> {
        let near = self.near_routers()?;
        let key = player.key();
        let location = self.location();

        let announce = [ServerMessage::RemovePlayerFromRoom {
            player: key.clone(),
            location,
        }];
        {
            let mut players = self.group.lock();
            if players.remove(key).is_none() {
                tracing::warn!(player = %key, %location, "remove of absent player");
                return Err(RouterError::PlayerNotFound(key.clone(), location));
            }
            deliver(&players, &announce, None);
        }
        tracing::info!(player = %key, %location, "player left room");

        for router in &near {
            router.group.send(&announce, None);
        }

        leave_cluster_chat(self, player);
        Ok(())
    }

    /// Moves a player into an adjacent room.
    ///
    /// The target is checked for adjacency and the player for presence
    /// before anything changes. The two maps are then swapped under both
    /// locks, taken in location order, so the player is never in zero or
    /// two rooms as seen by any other thread.
    ///
    /// A player whose client drops during the move still lands in the
    /// target room; messages to the dead client are discarded.
    fn move_player(&self, player: &Arc<Player>, target: Location) -> Result<(), RouterError> {
        let key = player.key();
        let source = self.location();

        let near = self.near()?;
        let Some(target_entry) = near.iter().find(|n| n.room.location() == target) else {
            tracing::error!(player = %key, from = %source, to = %target, "move to non-adjacent room");
            return Err(RouterError::NotAdjacent { from: source, to: target });
        };
        let target_router = target_entry
            .router()
            .ok_or(RouterError::RoomNotFound(target_entry.room.id()))?;
        let source_near = self.near_routers()?;
        let target_near = target_router.near_routers()?;

        {
            let (mut from, mut to) = lock_pair(&self.group, &target_router.group);
            if from.remove(key).is_none() {
                tracing::warn!(player = %key, location = %source, "move of absent player");
                return Err(RouterError::PlayerNotFound(key.clone(), source));
            }
            player.set_location(target);
            to.insert(key.clone(), Arc::clone(player));

            let change = [ServerMessage::LocationChange {
                player: key.clone(),
                location: target,
            }];
            deliver(&from, &change, None);
            deliver(&to, &change, Some(key));
        }
        tracing::info!(player = %key, from = %source, to = %target, "player moved");

        let removal = [ServerMessage::RemovePlayerFromRoom {
            player: key.clone(),
            location: source,
        }];
        for router in &source_near {
            if router.location() != target {
                router.group.send(&removal, None);
            }
        }

        leave_cluster_chat(self, player);

        player.send_message(ServerMessage::CleanGhosts {
            player: key.clone(),
            location: target,
        });

        let arrival = [ServerMessage::AddPlayerToRoom {
            player: player.summary(),
        }];
        for router in &target_near {
            if router.location() == source {
                continue;
            }
            router.group.send(&arrival, None);
            Self::send_room_snapshot(player, router);
        }

        join_cluster_chat(&*target_router, player);
        Ok(())
    }

    fn send_messages(
        &self,
        msgs: &[ServerMessage],
        except: Option<&PlayerKey>,
        scope: Scope,
    ) -> Result<(), RouterError> {
        if scope.includes_local() {
            self.group.send(msgs, except);
        }
        if scope.includes_near() {
            for router in self.near_routers()? {
                router.group.send(msgs, except);
            }
        }
        Ok(())
    }

    /// Looks in the local group first, then in the near groups.
    fn get_player(&self, key: &PlayerKey) -> Option<Arc<Player>> {
        if let Some(player) = self.group.get(key) {
            return Some(player);
        }
        self.near_routers()
            .ok()?
            .iter()
            .find_map(|router| router.group.get(key))
    }
}
