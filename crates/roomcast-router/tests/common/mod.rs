//! Shared fixtures for the router integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use roomcast_chat::ChatConfig;
use roomcast_protocol::{LinkId, Location, PlayerKey, RoomId, ServerMessage};
use roomcast_router::{MessageRouter, World, WorldConfig};
use roomcast_session::{Player, PlayerReceiver};
use tracing_subscriber::EnvFilter;

/// Enables log output with `RUST_LOG=debug cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn loc(id: u32) -> Location {
    Location::room(1, 1, 1, 1, RoomId(id))
}

/// Rooms `1..=n` in a line. Link `i` joins room `i` and room `i + 1` and
/// carries a closed door.
pub fn chain_config(n: u32) -> WorldConfig {
    let mut config = WorldConfig::new();
    for id in 1..=n {
        config = config.with_room(loc(id), format!("room {id}"));
    }
    for id in 1..n {
        config = config.with_door(LinkId(id), RoomId(id), RoomId(id + 1), false);
    }
    config
}

pub fn chain(n: u32) -> World {
    init_tracing();
    World::build(&chain_config(n), ChatConfig::default()).unwrap()
}

pub fn router(world: &World, room: u32) -> Arc<dyn MessageRouter> {
    world.router(&loc(room)).unwrap()
}

/// Creates a connected player and adds them to `room`.
pub fn join(world: &World, key: &str, room: u32) -> (Arc<Player>, PlayerReceiver) {
    let (player, rx) = Player::with_channel(PlayerKey::new(key), key.to_uppercase(), loc(room));
    router(world, room).add_player(&player).unwrap();
    (player, rx)
}

pub fn drain(rx: &mut PlayerReceiver) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

pub fn count(msgs: &[ServerMessage], kind: &str) -> usize {
    msgs.iter().filter(|m| m.kind() == kind).count()
}

/// Messages about `player` of the given kind.
pub fn about(msgs: &[ServerMessage], kind: &str, player: &PlayerKey) -> usize {
    msgs.iter()
        .filter(|m| m.kind() == kind)
        .filter(|m| match m {
            ServerMessage::AddPlayerToRoom { player: p } => p.key == *player,
            ServerMessage::RemovePlayerFromRoom { player: p, .. }
            | ServerMessage::LocationChange { player: p, .. }
            | ServerMessage::CleanGhosts { player: p, .. }
            | ServerMessage::PlayerConnectedToGame { player: p, .. }
            | ServerMessage::AddPlayerToChatRoom { player: p, .. }
            | ServerMessage::RemPlayerFromChatRoom { player: p, .. } => p == player,
            _ => false,
        })
        .count()
}

/// Snapshot messages (`DoorsState` or `RoomPlayerData`) for `location`.
pub fn snapshots_of(msgs: &[ServerMessage], location: Location) -> (usize, usize) {
    let doors = msgs
        .iter()
        .filter(|m| matches!(m, ServerMessage::DoorsState { location: l, .. } if *l == location))
        .count();
    let players = msgs
        .iter()
        .filter(|m| matches!(m, ServerMessage::RoomPlayerData { location: l, .. } if *l == location))
        .count();
    (doors, players)
}
