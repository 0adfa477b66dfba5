//! Routing for flat tile maps.
//!
//! A tile map is one open area with no neighbors, so its 2-ring is just its
//! local group: `Scope::Extended` behaves like `Scope::Local` and
//! `Scope::Near` reaches nobody. Players leave a tile map through
//! `remove_player` and enter another router with `add_player`; there is no
//! adjacency to move along.

use std::sync::Arc;

use roomcast_chat::ChatConfig;
use roomcast_protocol::{Location, LocationKind, PlayerKey, Scope, ServerMessage};
use roomcast_session::Player;

use crate::chat::{join_cluster_chat, leave_cluster_chat};
use crate::router::{LocalGroup, deliver};
use crate::{MessageRouter, RouterError};

/// The router of one tile map.
#[derive(Debug)]
pub struct TileMapRouter {
    group: LocalGroup,
    chat_config: ChatConfig,
}

impl TileMapRouter {
    /// # Errors
    /// [`RouterError::WrongLocationKind`] unless `location` is a tile map.
    pub fn new(location: Location, chat_config: ChatConfig) -> Result<Self, RouterError> {
        if !location.is_tile_map() {
            return Err(RouterError::WrongLocationKind {
                location,
                expected: LocationKind::TileMap,
            });
        }
        Ok(Self {
            group: LocalGroup::new(location),
            chat_config,
        })
    }
}

impl MessageRouter for TileMapRouter {
    fn group(&self) -> &LocalGroup {
        &self.group
    }

    fn chat_config(&self) -> &ChatConfig {
        &self.chat_config
    }

    fn add_player(&self, player: &Arc<Player>) -> Result<(), RouterError> {
        let key = player.key();
        let location = self.location();
        {
            let mut players = self.group.lock();
            players.insert(key.clone(), Arc::clone(player));
            player.set_location(location);
            if !player.is_connected_to_game() {
                return Ok(());
            }
            deliver(
                &players,
                &[ServerMessage::AddPlayerToRoom {
                    player: player.summary(),
                }],
                Some(key),
            );
        }
        tracing::info!(player = %key, %location, "player joined tile map");

        player.send_message(ServerMessage::RoomPlayerData {
            location,
            players: self.group.summaries(Some(key)),
        });
        join_cluster_chat(self, player);
        Ok(())
    }

    fn remove_player(&self, player: &Arc<Player>) -> Result<(), RouterError> {
        let key = player.key();
        let location = self.location();
        {
            let mut players = self.group.lock();
            if players.remove(key).is_none() {
                tracing::warn!(player = %key, %location, "remove of absent player");
                return Err(RouterError::PlayerNotFound(key.clone(), location));
            }
            deliver(
                &players,
                &[ServerMessage::RemovePlayerFromRoom {
                    player: key.clone(),
                    location,
                }],
                None,
            );
        }
        tracing::info!(player = %key, %location, "player left tile map");

        leave_cluster_chat(self, player);
        Ok(())
    }

    fn move_player(&self, player: &Arc<Player>, target: Location) -> Result<(), RouterError> {
        tracing::error!(player = %player.key(), from = %self.location(), to = %target, "move on tile map");
        Err(RouterError::MoveUnsupported(self.location()))
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
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use roomcast_protocol::{DEFAULT_CHAT, RoomId};

    use super::*;

    fn plains() -> Location {
        Location::tile_map(1, 4)
    }

    fn router() -> TileMapRouter {
        TileMapRouter::new(plains(), ChatConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_room_location() {
        let result = TileMapRouter::new(
            Location::room(1, 1, 1, 1, RoomId(1)),
            ChatConfig::default(),
        );
        assert!(matches!(
            result,
            Err(RouterError::WrongLocationKind {
                expected: LocationKind::TileMap,
                ..
            })
        ));
    }

    #[test]
    fn test_add_player_announces_to_local_group() {
        let router = router();
        let (ann, mut ann_rx) = Player::with_channel(PlayerKey::new("ann"), "Ann", plains());
        router.add_player(&ann).unwrap();
        while ann_rx.try_recv().is_ok() {}

        let (bob, mut bob_rx) = Player::with_channel(PlayerKey::new("bob"), "Bob", plains());
        router.add_player(&bob).unwrap();

        assert_eq!(ann_rx.try_recv().unwrap().kind(), "AddPlayerToRoom");
        assert_eq!(
            ann_rx.try_recv().unwrap(),
            ServerMessage::AddPlayerToChatRoom {
                player: bob.key().clone(),
                chat: DEFAULT_CHAT
            }
        );
        match bob_rx.try_recv().unwrap() {
            ServerMessage::RoomPlayerData { location, players } => {
                assert_eq!(location, plains());
                assert_eq!(players.len(), 1);
                assert_eq!(players[0].key, *ann.key());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_near_scope_reaches_nobody() {
        let router = router();
        let (ann, mut ann_rx) = Player::with_channel(PlayerKey::new("ann"), "Ann", plains());
        router.add_player(&ann).unwrap();
        while ann_rx.try_recv().is_ok() {}

        let msg = ServerMessage::Warning {
            message: "x".to_string(),
        };
        router.send_message(msg.clone(), None, Scope::Near).unwrap();
        assert!(ann_rx.try_recv().is_err());

        router.send_message(msg.clone(), None, Scope::Extended).unwrap();
        assert_eq!(ann_rx.try_recv().unwrap(), msg);
    }

    #[test]
    fn test_move_player_unsupported() {
        let router = router();
        let ann = Arc::new(Player::new(PlayerKey::new("ann"), "Ann", plains()));
        router.add_player(&ann).unwrap();

        let result = router.move_player(&ann, Location::tile_map(1, 5));

        assert!(matches!(result, Err(RouterError::MoveUnsupported(l)) if l == plains()));
        assert!(router.group().contains(ann.key()));
    }

    #[test]
    fn test_remove_absent_player_returns_not_found() {
        let router = router();
        let ann = Arc::new(Player::new(PlayerKey::new("ann"), "Ann", plains()));
        assert!(matches!(
            router.remove_player(&ann),
            Err(RouterError::PlayerNotFound(..))
        ));
    }
}
