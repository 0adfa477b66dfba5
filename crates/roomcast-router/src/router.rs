//! The routing contract shared by every kind of router.
//!
//! A router owns the players physically present at one [`Location`] (its
//! *local group*) and fans messages out to them. Routers that know about
//! neighbors extend the fan-out to *near* groups through [`Scope`].
//!
//! # Locking
//!
//! Each [`LocalGroup`] sits behind its own mutex. Broadcasts iterate the map
//! while holding it, and membership changes hold it for the whole
//! insert-and-announce step, so a removal can never interleave with a
//! broadcast half way. Locks are always taken in this order:
//!
//! ```text
//! group map(s) → player fields → chat list
//! ```
//!
//! A chat-list lock is never held while a group lock is being acquired.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use roomcast_chat::ChatConfig;
use roomcast_protocol::{Location, PlayerKey, PlayerSummary, Scope, ServerMessage};
use roomcast_session::{Player, PlayerSender};

use crate::RouterError;
use crate::chat;

pub(crate) type PlayerMap = HashMap<PlayerKey, Arc<Player>>;

/// Pushes every message in `msgs` to every player of `players` except
/// `except`.
pub(crate) fn deliver(players: &PlayerMap, msgs: &[ServerMessage], except: Option<&PlayerKey>) {
    for (key, player) in players {
        if Some(key) == except {
            continue;
        }
        for msg in msgs {
            player.send_message(msg.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// LocalGroup
// ---------------------------------------------------------------------------

/// The players physically present at one location.
#[derive(Debug)]
pub struct LocalGroup {
    location: Location,
    players: Mutex<PlayerMap>,
}

impl LocalGroup {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            players: Mutex::new(HashMap::new()),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, PlayerMap> {
        self.players.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &PlayerKey) -> Option<Arc<Player>> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &PlayerKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the group, ordered by key.
    pub fn players(&self) -> Vec<Arc<Player>> {
        let mut players: Vec<Arc<Player>> = self.lock().values().cloned().collect();
        players.sort_by(|a, b| a.key().cmp(b.key()));
        players
    }

    /// Keys of the group, ordered.
    pub fn keys(&self) -> Vec<PlayerKey> {
        let mut keys: Vec<PlayerKey> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Public data of the group, ordered by key, without `except`.
    pub fn summaries(&self, except: Option<&PlayerKey>) -> Vec<PlayerSummary> {
        let mut out: Vec<PlayerSummary> = self
            .lock()
            .iter()
            .filter(|(key, _)| Some(*key) != except)
            .map(|(_, player)| player.summary())
            .collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }

    /// Sends a batch to the whole group, except one player.
    pub fn send(&self, msgs: &[ServerMessage], except: Option<&PlayerKey>) {
        deliver(&self.lock(), msgs, except);
    }

    /// Drops every player without telling anyone. Returns how many there
    /// were.
    pub(crate) fn clear(&self) -> usize {
        let mut players = self.lock();
        let count = players.len();
        players.clear();
        count
    }
}

// ---------------------------------------------------------------------------
// MessageRouter
// ---------------------------------------------------------------------------

/// A routing domain for one location.
///
/// Implementors provide the membership protocol (`add_player`,
/// `remove_player`, `move_player`) and the scoped fan-out
/// (`send_messages`). Everything else has a default built on those and on
/// [`group`](Self::group).
///
/// Routers never own a player's lifecycle: they hold `Arc<Player>` handles
/// for as long as the player is present and forget them on removal.
pub trait MessageRouter: Send + Sync {
    /// The players physically present here.
    fn group(&self) -> &LocalGroup;

    fn chat_config(&self) -> &ChatConfig;

    fn location(&self) -> Location {
        self.group().location()
    }

    /// Registers a player here and sets their location.
    ///
    /// An existing entry for the same key is overwritten. Players without a
    /// client are placed silently; connected players are announced and
    /// receive the state they need to render their surroundings.
    ///
    /// The caller is responsible for removing the player from any other
    /// router first. Use `move_player` between adjacent rooms.
    fn add_player(&self, player: &Arc<Player>) -> Result<(), RouterError>;

    /// Removes a player and announces the departure.
    ///
    /// # Errors
    /// [`RouterError::PlayerNotFound`] if the player is not here.
    fn remove_player(&self, player: &Arc<Player>) -> Result<(), RouterError>;

    /// Transfers a player from this router to the router at `target`.
    ///
    /// Either completes fully or fails before touching either router.
    fn move_player(&self, player: &Arc<Player>, target: Location) -> Result<(), RouterError>;

    /// Sends a batch of messages to the groups selected by `scope`.
    ///
    /// No player receives the batch twice.
    fn send_messages(
        &self,
        msgs: &[ServerMessage],
        except: Option<&PlayerKey>,
        scope: Scope,
    ) -> Result<(), RouterError>;

    fn send_message(
        &self,
        msg: ServerMessage,
        except: Option<&PlayerKey>,
        scope: Scope,
    ) -> Result<(), RouterError> {
        self.send_messages(std::slice::from_ref(&msg), except, scope)
    }

    /// Looks a player up in the local group.
    fn get_player(&self, key: &PlayerKey) -> Option<Arc<Player>> {
        self.group().get(key)
    }

    fn players(&self) -> Vec<Arc<Player>> {
        self.group().players()
    }

    fn player_count(&self) -> usize {
        self.group().len()
    }

    /// Drops every player without notifications. Only for world teardown.
    fn remove_all_players(&self) -> usize {
        let count = self.group().clear();
        tracing::debug!(location = %self.location(), count, "router cleared");
        count
    }

    /// Attaches a client to a player standing here and tells the 2-ring.
    ///
    /// # Errors
    /// - [`RouterError::PlayerNotFound`] if the player is not here
    /// - [`RouterError::Session`] if a client is already attached
    fn connection_opened(
        &self,
        player: &Arc<Player>,
        sender: PlayerSender,
    ) -> Result<(), RouterError> {
        if !self.group().contains(player.key()) {
            return Err(RouterError::PlayerNotFound(
                player.key().clone(),
                self.location(),
            ));
        }
        player.connect(sender)?;
        tracing::info!(player = %player.key(), location = %self.location(), "player connected to game");
        self.send_message(
            ServerMessage::PlayerConnectedToGame {
                player: player.key().clone(),
                connected: true,
            },
            Some(player.key()),
            Scope::Extended,
        )
    }

    /// Detaches a player's client. The player leaves any named chat room
    /// and forgets the cluster's chat list; their room membership is kept.
    ///
    /// # Errors
    /// - [`RouterError::PlayerNotFound`] if the player is not here
    /// - [`RouterError::Session`] if no client was attached
    fn connection_closed(&self, player: &Arc<Player>) -> Result<(), RouterError> {
        if !self.group().contains(player.key()) {
            return Err(RouterError::PlayerNotFound(
                player.key().clone(),
                self.location(),
            ));
        }
        chat::leave_named_chat_or_reset(self, player);
        player.set_chat_list(None);
        player.disconnect()?;
        tracing::info!(player = %player.key(), location = %self.location(), "player left game");
        self.send_message(
            ServerMessage::PlayerConnectedToGame {
                player: player.key().clone(),
                connected: false,
            },
            Some(player.key()),
            Scope::Extended,
        )
    }
}
